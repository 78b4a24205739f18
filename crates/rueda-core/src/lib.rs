//! # rueda-core: Pure Business Logic for Rueda POS
//!
//! This crate holds every rule of the shop's point of sale that can be
//! expressed without touching the network, the disk or the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rueda POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rueda-shell (commands, CLI)                  │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │                                 │                    │
//! │  ┌───────────────▼───────────────┐  ┌──────────────▼────────────────┐  │
//! │  │  rueda-store (SQLite KV)      │  │  rueda-api (REST client)      │  │
//! │  └───────────────┬───────────────┘  └──────────────┬────────────────┘  │
//! │                  │                                 │                    │
//! │  ┌───────────────▼─────────────────────────────────▼───────────────┐   │
//! │  │               ★ rueda-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌───────────┐ ┌────────┐ ┌──────────┐  │   │
//! │  │   │ money  │ │  cart  │ │ dashboard │ │  debt  │ │ currency │  │   │
//! │  │   └────────┘ └────────┘ └───────────┘ └────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart session state machine
//! - [`dashboard`] - Sales/stock summary reducer
//! - [`debt`] - Client credit status classification
//! - [`currency`] - USD → VES display conversion
//! - [`auth`] - Roles and permissions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation run before any network call
//!
//! ## Example Usage
//!
//! ```rust
//! use rueda_core::money::Money;
//! use rueda_core::types::Percent;
//!
//! let price = Money::from_cents(10_000); // $100.00
//! let discounted = price.apply_percentage_discount(Percent::from_percentage(15.0));
//! assert_eq!(discounted.cents(), 8_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod currency;
pub mod dashboard;
pub mod debt;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{Permission, Role, User};
pub use cart::{Cart, CartItem, CartTotals, ClientRef};
pub use currency::{ExchangeRate, ExchangeRates, RateSource};
pub use dashboard::{CalendarWindow, DashboardSummary, TopProduct};
pub use debt::{CreditPolicy, DebtReport, DebtStatus, DebtSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product without `min_stock` counts as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Venezuela runs on UTC−04:00 all year. Backend timestamps without an
/// offset are read in this zone.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;

/// Number of entries in the dashboard's best-seller ranking.
pub const TOP_SELLING_LIMIT: usize = 3;

/// Days of credit granted from account creation.
///
/// Unconfirmed business rule; the backend exposes no due-date field, so this
/// only seeds [`CreditPolicy::default`].
pub const DEFAULT_CREDIT_WINDOW_DAYS: i64 = 30;

/// A credit due within this many days is reported as due soon.
pub const DUE_SOON_DAYS: i64 = 7;
