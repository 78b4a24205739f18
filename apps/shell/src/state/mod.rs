//! # State Module
//!
//! Manages application state for the shell.
//!
//! ## Why Multiple State Types? (Option B)
//! Instead of a single struct every command locks, each concern gets its
//! own state type and commands take only the ones they need:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState (lib.rs)                          │   │
//! │  │  holds one of each; commands borrow the parts they use          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │        │             │             │             │            │         │
//! │        ▼             ▼             ▼             ▼            ▼         │
//! │  ┌──────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌──────────┐   │
//! │  │ Config   │ │ ApiState  │ │ StoreState│ │ CartStore │ │ Session  │   │
//! │  │ State    │ │           │ │           │ │           │ │ State    │   │
//! │  │ offset,  │ │ HttpClient│ │ SQLite    │ │ Arc<Mutex │ │ user +   │   │
//! │  │ rates,   │ │ + Query   │ │ snapshots │ │ <Cart>> + │ │ POS      │   │
//! │  │ credit   │ │   Cache   │ │           │ │ watch     │ │ session  │   │
//! │  └──────────┘ └───────────┘ └───────────┘ └───────────┘ └──────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState: Read-only after initialization                         │
//! │  • ApiState: HttpClient and QueryCache are internally synchronized     │
//! │  • StoreState: SqlitePool is thread-safe                               │
//! │  • CartStore / SessionState: tokio locks, one writer per snapshot key  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod cart;
mod config;
mod session;
mod store;

pub use api::ApiState;
pub use cart::CartStore;
pub use config::{ConfigState, DEFAULT_UTC_OFFSET_HOURS};
pub use session::{AuthSnapshot, PosSession, SessionState};
pub use store::{ConnectionSettings, StoreState};
