//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell state (CartStore, SessionState, ...)                            │
//! │       │                                                                 │
//! │       │  store.snapshots().put_json(SnapshotKey::Cart, &cart)          │
//! │       ▼                                                                 │
//! │  SnapshotRepository                                                    │
//! │  ├── get / get_json                                                    │
//! │  ├── put / put_json                                                    │
//! │  ├── remove                                                            │
//! │  └── keys                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_snapshots table                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod snapshot;
