//! # Commands Module
//!
//! Every operation the shell exposes, callable from the CLI or any other host.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── cart.rs        ◄─── Cart manipulation
//! ├── sale.rs        ◄─── Checkout and sales history
//! ├── dashboard.rs   ◄─── Home screen counters
//! ├── debt.rs        ◄─── Client debt report
//! ├── clients.rs     ◄─── Client CRUD and balance adjustments
//! ├── products.rs    ◄─── Product CRUD and SKU regeneration
//! ├── categories.rs  ◄─── Category CRUD
//! ├── rates.rs       ◄─── Exchange rates and dual-currency prices
//! ├── auth.rs        ◄─── Login / logout
//! └── settings.rs    ◄─── Backend URL
//! ```
//!
//! ## State Injection (Option B)
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! async fn get_cart(cart: &CartStore) -> CartResponse
//!
//! // Needs the backend and the cart
//! async fn add_to_cart(api: &ApiState, cart: &CartStore, product_id: &str)
//!
//! // Protected: also needs the session for the permission check
//! async fn adjust_balance(api: &ApiState, session: &SessionState, ...)
//! ```
//!
//! ## Failure Rules
//! - Input is validated before any network call (`VALIDATION_ERROR`)
//! - Business-rule failures leave local state unchanged
//! - Successful writes invalidate the cached queries they affect

pub mod auth;
pub mod cart;
pub mod categories;
pub mod clients;
pub mod dashboard;
pub mod debt;
pub mod products;
pub mod rates;
pub mod sale;
pub mod settings;
