//! # Configuration State
//!
//! Shop-level settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`RUEDA_*`)
//! 2. Defaults (this file)
//!
//! Backend connection settings live in `rueda_api::ApiConfig` (`api.toml`).
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use chrono::{FixedOffset, Offset, Utc};
use rueda_core::{CreditPolicy, RateSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use rueda_core::DEFAULT_UTC_OFFSET_HOURS;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown on receipts and the CLI banner)
    pub store_name: String,

    /// Offset used to decide what "today" and "this month" mean
    pub utc_offset_hours: i32,

    /// Which exchange rate the VES price column uses
    pub rate_source: RateSource,

    /// Credit window and due-soon horizon for the debt report
    pub credit_policy: CreditPolicy,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Rueda Bike & Moto".to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            rate_source: RateSource::Bcv,
            credit_policy: CreditPolicy::default(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `RUEDA_STORE_NAME`: Override store name
    /// - `RUEDA_UTC_OFFSET_HOURS`: Calendar offset, e.g. "-4"
    /// - `RUEDA_RATE_SOURCE`: "bcv" or "parallel"
    /// - `RUEDA_CREDIT_WINDOW_DAYS`: Days of credit from account creation
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("RUEDA_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(raw) = lookup("RUEDA_UTC_OFFSET_HOURS") {
            match raw.trim().parse::<i32>() {
                Ok(hours) if (-12..=14).contains(&hours) => config.utc_offset_hours = hours,
                _ => warn!(value = %raw, "Ignoring invalid RUEDA_UTC_OFFSET_HOURS"),
            }
        }

        if let Some(raw) = lookup("RUEDA_RATE_SOURCE") {
            match raw.parse::<RateSource>() {
                Ok(source) => config.rate_source = source,
                Err(e) => warn!(error = %e, "Ignoring invalid RUEDA_RATE_SOURCE"),
            }
        }

        if let Some(raw) = lookup("RUEDA_CREDIT_WINDOW_DAYS") {
            match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => config.credit_policy.window_days = days,
                _ => warn!(value = %raw, "Ignoring invalid RUEDA_CREDIT_WINDOW_DAYS"),
            }
        }

        config
    }

    /// The configured offset as a chrono timezone.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600))
            .unwrap_or_else(|| Utc.fix())
    }
}
