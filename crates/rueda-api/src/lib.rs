//! # rueda-api: REST Backend Client for Rueda POS
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rueda-shell commands                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rueda-api (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   QueryCache ──► HttpClient ──► endpoints (products, sales, …) │   │
//! │  │                      │                                          │   │
//! │  │                      └── retry/backoff (GET only)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │ JSON over HTTP                                                 │
//! │       ▼                                                                 │
//! │  Shop backend ($RUEDA_API_URL, default http://localhost:3001/api)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = ApiConfig::load_or_default(None);
//! let client = HttpClient::new(&config)?;
//! let cache = QueryCache::new(config.refresh_interval());
//!
//! let products = cache.fetch("products", || client.list_products()).await?;
//! ```

pub mod cache;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;

pub use cache::QueryCache;
pub use config::ApiConfig;
pub use endpoints::{LoginRequest, LoginResponse};
pub use error::{ApiError, ApiResult};
pub use http::HttpClient;

/// Cache keys shared by readers and the mutations that invalidate them.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const SALES: &str = "sales";
    pub const SALE_ITEMS: &str = "sale_items";
    pub const CLIENTS: &str = "clients";
    pub const CATEGORIES: &str = "categories";

    pub fn credits(client_id: &str) -> String {
        format!("{}/{}/credits", CLIENTS, client_id)
    }
}
