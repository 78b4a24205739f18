//! # rueda-store: Local Snapshot Store for Rueda POS
//!
//! Persists the few pieces of client-side state that must survive a restart
//! (the open cart, the POS session, exchange rates, settings, the logged-in
//! user) as JSON blobs in a local SQLite file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rueda-shell (CartStore write-through, SessionState, settings)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   rueda-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │    Store      │    │ SnapshotRepository │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  get/put/remove    │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file: $RUEDA_DB_PATH or <data dir>/rueda.db                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rueda_store::{SnapshotKey, Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("rueda.db")).await?;
//! store.snapshots().put_json(SnapshotKey::Cart, &cart).await?;
//! let restored: Option<Cart> = store.snapshots().get_json(SnapshotKey::Cart).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
pub use repository::snapshot::{SnapshotKey, SnapshotRepository};
