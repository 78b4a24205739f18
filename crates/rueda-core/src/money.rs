//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every price, subtotal and balance is an i64 count of cents.          │
//! │    The backend speaks decimals; we convert ONLY at the JSON boundary    │
//! │    (see [`decimal`]) and never do arithmetic on floats.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rueda_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2;             // $21.98
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 1599);
//! assert_eq!(doubled.cents(), 2198);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (USD unless stated otherwise).
///
/// - **i64 (signed)**: client balances are negative when the client owes money
/// - **Serde**: serializes as raw cents; backend DTOs opt into
///   [`decimal`] to speak the API's `12.50` format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    ///
    /// let balance = Money::from_cents(-100_000);
    /// assert_eq!(balance.abs().cents(), 100_000);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2_999); // Cámara 29x2.10
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8_997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `rate` of this amount, rounded half away from zero to the cent.
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    /// use rueda_core::types::Percent;
    ///
    /// let subtotal = Money::from_cents(999);
    /// // 10% of $9.99 = $0.999 → $1.00
    /// assert_eq!(subtotal.percentage_of(Percent::from_bps(1000)).cents(), 100);
    /// ```
    pub fn percentage_of(&self, rate: Percent) -> Money {
        // i128 keeps large balances × 10_000 from overflowing
        let raw = self.0 as i128 * rate.bps() as i128;
        let rounded = if raw >= 0 {
            (raw + 5000) / 10000
        } else {
            (raw - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## User Workflow
    /// ```text
    /// Line: Llanta 17" × 2 = $120.00, item discount 10%
    ///      │
    ///      ▼
    /// apply_percentage_discount(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line total: $108.00
    /// ```
    ///
    /// ```rust
    /// use rueda_core::money::Money;
    /// use rueda_core::types::Percent;
    ///
    /// let subtotal = Money::from_cents(10_000);
    /// let discounted = subtotal.apply_percentage_discount(Percent::from_bps(1000));
    /// assert_eq!(discounted.cents(), 9_000);
    /// ```
    pub fn apply_percentage_discount(&self, discount: Percent) -> Money {
        *self - self.percentage_of(discount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly `$10.99` rendering. Localized display lives in
/// [`crate::currency`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Parses `"12.50"`, `"12.5"`, `"12"` or `"-3.05"`. At most two decimals.
///
/// ```rust
/// use rueda_core::money::Money;
///
/// assert_eq!("85.5".parse::<Money>().unwrap(), Money::from_cents(8_550));
/// assert!("1.005".parse::<Money>().is_err());
/// ```
impl std::str::FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("expected a number with up to two decimals, got '{}'", s),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Decimal Wire Format
// =============================================================================

/// Serde adapter for the backend's decimal amounts (`"salePrice": 12.5`).
///
/// ```rust
/// use rueda_core::money::Money;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Line {
///     #[serde(with = "rueda_core::money::decimal")]
///     price: Money,
/// }
///
/// let line: Line = serde_json::from_str(r#"{"price": 12.5}"#).unwrap();
/// assert_eq!(line.price.cents(), 1250);
/// assert_eq!(serde_json::to_string(&line).unwrap(), r#"{"price":12.5}"#);
/// ```
pub mod decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn to_cents(value: f64) -> i64 {
        (value * 100.0).round() as i64
    }

    pub(crate) fn to_decimal(money: Money) -> f64 {
        money.cents() as f64 / 100.0
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_decimal(*money))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Money::from_cents(to_cents(value)))
    }

    /// Same as the parent module for `Option<Money>` fields.
    pub mod option {
        use super::{to_cents, to_decimal};
        use crate::money::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&to_decimal(*m)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            let value = Option::<f64>::deserialize(deserializer)?;
            Ok(value.map(|v| Money::from_cents(to_cents(v))))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_parse() {
        assert_eq!("12".parse::<Money>().unwrap(), Money::from_cents(1_200));
        assert_eq!(" 0.05 ".parse::<Money>().unwrap(), Money::from_cents(5));
        assert_eq!("-3.5".parse::<Money>().unwrap(), Money::from_cents(-350));
        assert!("".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::from_cents(100), Money::from_cents(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 350);
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        // 15% of $0.10 = 1.5 cents → 2 cents
        let amount = Money::from_cents(10);
        assert_eq!(amount.percentage_of(Percent::from_bps(1500)).cents(), 2);
        // 15% of $0.09 = 1.35 cents → 1 cent
        assert_eq!(
            Money::from_cents(9).percentage_of(Percent::from_bps(1500)).cents(),
            1
        );
    }

    #[test]
    fn test_percentage_discount_bounds() {
        let subtotal = Money::from_cents(12_345);
        assert_eq!(
            subtotal.apply_percentage_discount(Percent::zero()).cents(),
            12_345
        );
        assert_eq!(
            subtotal.apply_percentage_discount(Percent::full()).cents(),
            0
        );
    }

    #[test]
    fn test_decimal_round_trip_of_awkward_value() {
        // 0.1 + 0.2 style values still land on the intended cent
        assert_eq!(decimal::to_cents(19.99), 1999);
        assert_eq!(decimal::to_cents(0.29), 29);
        assert_eq!(decimal::to_decimal(Money::from_cents(1999)), 19.99);
    }
}
