//! # Currency Display
//!
//! Prices are kept in USD cents. The counter also shows the bolívar (VES)
//! equivalent using one of two published rates.
//!
//! ```text
//!   Money (USD cents) ──┬──► usd_display ────► "$1,234.56"
//!                       │
//!   ExchangeRates ──────┴──► to_ves_display ─► "Bs. 45.061,44"
//!   (bcv | parallel)                            "Bs. --" when no rate
//! ```
//!
//! Rates are VES per USD with four decimals, stored as an integer scaled by
//! 10_000 so the conversion stays in integer arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Shown instead of an amount when no usable rate is available.
pub const VES_UNAVAILABLE: &str = "Bs. --";

// =============================================================================
// Exchange Rate
// =============================================================================

/// VES per USD, scaled by 10_000 (`36.5012` → `365_012`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(i64);

impl ExchangeRate {
    const SCALE: i64 = 10_000;

    pub const fn from_scaled(value: i64) -> Self {
        ExchangeRate(value)
    }

    /// Builds a rate from a published decimal like `36.5012`.
    pub fn from_decimal(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            return ExchangeRate(0);
        }
        ExchangeRate((value * Self::SCALE as f64).round() as i64)
    }

    pub const fn scaled(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub const fn is_usable(&self) -> bool {
        self.0 > 0
    }

    /// Converts USD cents into VES cents, rounding half away from zero.
    pub fn convert(&self, usd: Money) -> i64 {
        let raw = usd.cents() as i128 * self.0 as i128;
        let half = Self::SCALE as i128 / 2;
        let rounded = if raw >= 0 {
            (raw + half) / Self::SCALE as i128
        } else {
            (raw - half) / Self::SCALE as i128
        };
        rounded as i64
    }
}

// =============================================================================
// Rate Source
// =============================================================================

/// Which published rate to convert with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Banco Central de Venezuela official rate.
    Bcv,
    Parallel,
}

impl Default for RateSource {
    fn default() -> Self {
        RateSource::Bcv
    }
}

impl std::str::FromStr for RateSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bcv" | "official" => Ok(RateSource::Bcv),
            "parallel" | "paralelo" => Ok(RateSource::Parallel),
            other => Err(ValidationError::InvalidFormat {
                field: "rate source".to_string(),
                reason: format!("expected 'bcv' or 'parallel', got '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Exchange Rates
// =============================================================================

/// The rates snapshot persisted under `exchange_rates_enhanced`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExchangeRates {
    #[serde(default)]
    pub bcv: Option<ExchangeRate>,
    #[serde(default)]
    pub parallel: Option<ExchangeRate>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExchangeRates {
    pub fn rate(&self, source: RateSource) -> Option<ExchangeRate> {
        let rate = match source {
            RateSource::Bcv => self.bcv,
            RateSource::Parallel => self.parallel,
        };
        rate.filter(ExchangeRate::is_usable)
    }

    /// True when the rates were never set or are older than `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.updated_at {
            Some(updated) => now - updated > max_age,
            None => true,
        }
    }
}

/// Both renderings of one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DualPrice {
    pub usd: String,
    pub ves: String,
}

// =============================================================================
// Formatting
// =============================================================================

/// `"$1,234.56"`
pub fn usd_display(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}${}", sign, group_cents(amount.cents().abs(), ',', '.'))
}

/// `"Bs. 1.234,56"`, or [`VES_UNAVAILABLE`] when the chosen rate is missing or zero.
///
/// ```rust
/// use rueda_core::currency::{to_ves_display, ExchangeRate, ExchangeRates, RateSource};
/// use rueda_core::Money;
///
/// let rates = ExchangeRates {
///     bcv: Some(ExchangeRate::from_decimal(36.5)),
///     ..Default::default()
/// };
/// assert_eq!(to_ves_display(Money::from_cents(10_000), &rates, RateSource::Bcv), "Bs. 3.650,00");
/// assert_eq!(to_ves_display(Money::from_cents(10_000), &rates, RateSource::Parallel), "Bs. --");
/// ```
pub fn to_ves_display(usd: Money, rates: &ExchangeRates, source: RateSource) -> String {
    match rates.rate(source) {
        Some(rate) => format!("Bs. {}", group_cents(rate.convert(usd), '.', ',')),
        None => VES_UNAVAILABLE.to_string(),
    }
}

pub fn dual_price(usd: Money, rates: &ExchangeRates, source: RateSource) -> DualPrice {
    DualPrice {
        usd: usd_display(usd),
        ves: to_ves_display(usd, rates, source),
    }
}

fn group_cents(cents: i64, thousands: char, decimal: char) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(digit);
    }

    format!("{}{}{}{:02}", sign, grouped, decimal, frac)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rates() -> ExchangeRates {
        ExchangeRates {
            bcv: Some(ExchangeRate::from_decimal(36.5012)),
            parallel: Some(ExchangeRate::from_decimal(40.0)),
            updated_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 13, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_rate_is_stored_with_four_decimals() {
        assert_eq!(ExchangeRate::from_decimal(36.5012).scaled(), 365_012);
        assert_eq!(ExchangeRate::from_decimal(-1.0).scaled(), 0);
    }

    #[test]
    fn test_usd_display() {
        assert_eq!(usd_display(Money::from_cents(123_456)), "$1,234.56");
        assert_eq!(usd_display(Money::from_cents(5)), "$0.05");
        assert_eq!(usd_display(Money::from_cents(100_000_000)), "$1,000,000.00");
        assert_eq!(usd_display(Money::from_cents(-99_999)), "-$999.99");
    }

    #[test]
    fn test_ves_display_uses_selected_source() {
        let amount = Money::from_cents(12_345); // $123.45
        assert_eq!(to_ves_display(amount, &rates(), RateSource::Parallel), "Bs. 4.938,00");
        // 123.45 × 36.5012 = 4506.073...
        assert_eq!(to_ves_display(amount, &rates(), RateSource::Bcv), "Bs. 4.506,07");
    }

    #[test]
    fn test_ves_display_without_rate() {
        let mut r = rates();
        r.bcv = Some(ExchangeRate::from_scaled(0));
        r.parallel = None;
        assert_eq!(to_ves_display(Money::from_cents(100), &r, RateSource::Bcv), VES_UNAVAILABLE);
        assert_eq!(to_ves_display(Money::from_cents(100), &r, RateSource::Parallel), VES_UNAVAILABLE);
    }

    #[test]
    fn test_dual_price() {
        let price = dual_price(Money::from_cents(150_000), &rates(), RateSource::Parallel);
        assert_eq!(price.usd, "$1,500.00");
        assert_eq!(price.ves, "Bs. 60.000,00");
    }

    #[test]
    fn test_staleness() {
        let r = rates();
        let updated = r.updated_at.unwrap();
        assert!(!r.is_stale(updated + Duration::hours(23), Duration::hours(24)));
        assert!(r.is_stale(updated + Duration::hours(25), Duration::hours(24)));
        assert!(ExchangeRates::default().is_stale(updated, Duration::hours(24)));
    }

    #[test]
    fn test_rate_source_parsing() {
        assert_eq!("BCV".parse::<RateSource>().unwrap(), RateSource::Bcv);
        assert_eq!("paralelo".parse::<RateSource>().unwrap(), RateSource::Parallel);
        assert!("euro".parse::<RateSource>().is_err());
    }
}
