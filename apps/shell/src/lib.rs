//! # rueda-shell: Application Shell for Rueda POS
//!
//! Wires configuration, the local store and the backend client into the
//! state types, and exposes every operation as a command.
//!
//! ## Module Organization
//! ```text
//! rueda_shell/
//! ├── lib.rs          ◄─── You are here (startup, AppState)
//! ├── main.rs         ◄─── `rueda` CLI
//! ├── state/
//! │   ├── config.rs   ◄─── Shop settings (offset, rate source, credit policy)
//! │   ├── api.rs      ◄─── HttpClient + QueryCache
//! │   ├── store.rs    ◄─── Snapshot store wrapper
//! │   ├── cart.rs     ◄─── CartStore (single owner of the cart)
//! │   └── session.rs  ◄─── Logged-in user and POS session
//! ├── commands/       ◄─── cart, sale, dashboard, debt, CRUD, rates, ...
//! └── error.rs        ◄─── CommandError { code, message }
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing() ── EnvFilter, default "info,rueda=debug,sqlx=warn"   │
//! │                                                                         │
//! │  2. database_path() ── $RUEDA_DB_PATH or platform data dir              │
//! │     • Linux: ~/.local/share/rueda-pos/rueda.db                          │
//! │     • macOS: ~/Library/Application Support/ve.rueda.rueda-pos/rueda.db  │
//! │                                                                         │
//! │  3. Store::open ── SQLite (WAL) + migrations                            │
//! │                                                                         │
//! │  4. AppState::build                                                     │
//! │     • ApiState from api.toml/env, base URL from `db_config` if saved    │
//! │     • CartStore restored from `cart`                                    │
//! │     • SessionState restored from `current_user` / `pos_session`,        │
//! │       token handed back to the HttpClient                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use rueda_api::ApiConfig;
use rueda_store::{Store, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use error::{CommandError, CommandResult};
use state::{ApiState, CartStore, ConfigState, SessionState, StoreState};

/// One of each state type. Commands borrow only the fields they need.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ConfigState,
    pub api: ApiState,
    pub store: StoreState,
    pub cart: CartStore,
    pub session: SessionState,
}

impl AppState {
    /// Builds the state from already-loaded parts.
    pub async fn build(config: ConfigState, api_config: &ApiConfig, store: Store) -> CommandResult<Self> {
        let store = StoreState::new(store);
        let api = ApiState::new(api_config)?;

        if let Some(settings) = store.connection_settings().await? {
            match api.client().set_base_url(&settings.api_url) {
                Ok(()) => info!(url = %settings.api_url, "Using saved API URL"),
                Err(e) => warn!(error = %e, "Ignoring saved API URL"),
            }
        }

        let cart = CartStore::load(store.snapshots()).await?;
        let session = SessionState::load(store.snapshots()).await?;
        if let Some(token) = session.token().await {
            api.client().set_token(Some(token));
        }

        info!(store_name = %config.store_name, api = %api.client().base_url(), "State initialized");
        Ok(AppState {
            config,
            api,
            store,
            cart,
            session,
        })
    }

    /// Opens the store at `db_path` and builds the state from env/api.toml.
    pub async fn open(db_path: PathBuf) -> CommandResult<Self> {
        info!(?db_path, "Database path determined");
        let store = Store::open(StoreConfig::new(db_path)).await?;
        let api_config = ApiConfig::load_or_default(None);
        Self::build(ConfigState::from_env(), &api_config, store).await
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rueda=trace` - Show trace for rueda crates only
/// - Default: `info,rueda=debug,sqlx=warn`
///
/// Logs go to stderr so CLI output on stdout stays valid JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rueda=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Determines the database file path based on the platform.
///
/// ## Development Override
/// Set `RUEDA_DB_PATH` to use a custom path.
pub fn database_path() -> CommandResult<PathBuf> {
    if let Ok(path) = std::env::var("RUEDA_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("ve", "rueda", "rueda-pos")
        .ok_or_else(|| CommandError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| CommandError::internal(format!("Could not create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("rueda.db"))
}
