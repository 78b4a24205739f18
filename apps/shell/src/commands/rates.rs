//! # Exchange Rate Commands
//!
//! The shop prices in USD and shows bolívares next to every price. Rates are
//! entered by hand (BCV and parallel) and kept under `exchange_rates_enhanced`.
//!
//! ```text
//! set_exchange_rates(bcv: 36.5, parallel: None)
//!        │
//!        ▼
//! { bcv: 36.5, parallel: <kept>, updatedAt: now } ──► snapshot store
//!        │
//!        ▼
//! price_display(85.50) ──► { usd: "$85.50", ves: "Bs. 3.120,75" }
//! ```

use chrono::{Duration, Utc};
use rueda_core::currency::{dual_price, DualPrice};
use rueda_core::{ExchangeRate, ExchangeRates, Money, Permission, RateSource};
use rueda_store::SnapshotKey;
use tracing::{debug, info, warn};

use crate::error::{CommandError, CommandResult};
use crate::state::{ConfigState, SessionState, StoreState};

/// Rates older than this are still used, with a warning.
const RATES_MAX_AGE_HOURS: i64 = 24;

/// Stored rates, or empty rates when none were ever saved.
pub async fn get_exchange_rates(store: &StoreState) -> CommandResult<ExchangeRates> {
    debug!("get_exchange_rates command");
    Ok(store
        .snapshots()
        .get_json(SnapshotKey::ExchangeRates)
        .await?
        .unwrap_or_default())
}

/// Updates one or both rates. `None` keeps the stored value.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a negative or non-finite rate
/// - `PERMISSION_DENIED` unless the user may change settings
pub async fn set_exchange_rates(
    store: &StoreState,
    session: &SessionState,
    bcv: Option<f64>,
    parallel: Option<f64>,
) -> CommandResult<ExchangeRates> {
    debug!(?bcv, ?parallel, "set_exchange_rates command");
    session.require(Permission::ManageSettings).await?;

    for (name, value) in [("bcv", bcv), ("parallel", parallel)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(CommandError::validation(format!(
                    "{} rate must be a non-negative number",
                    name
                )));
            }
        }
    }

    let mut rates = get_exchange_rates(store).await?;
    if let Some(v) = bcv {
        rates.bcv = Some(ExchangeRate::from_decimal(v));
    }
    if let Some(v) = parallel {
        rates.parallel = Some(ExchangeRate::from_decimal(v));
    }
    rates.updated_at = Some(Utc::now());

    store
        .snapshots()
        .put_json(SnapshotKey::ExchangeRates, &rates)
        .await?;

    info!(
        bcv = ?rates.bcv.map(|r| r.as_decimal()),
        parallel = ?rates.parallel.map(|r| r.as_decimal()),
        "Exchange rates updated"
    );
    Ok(rates)
}

/// Formats a USD amount in both currencies. `source` defaults to the shop's
/// configured rate source.
pub async fn price_display(
    store: &StoreState,
    config: &ConfigState,
    usd: Money,
    source: Option<RateSource>,
) -> CommandResult<DualPrice> {
    let source = source.unwrap_or(config.rate_source);
    debug!(%usd, ?source, "price_display command");

    let rates = get_exchange_rates(store).await?;
    if rates.is_stale(Utc::now(), Duration::hours(RATES_MAX_AGE_HOURS)) {
        warn!(updated_at = ?rates.updated_at, "Exchange rates are missing or older than a day");
    }

    Ok(dual_price(usd, &rates, source))
}
