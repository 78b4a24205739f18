//! # Store Migrations
//!
//! SQL files in `migrations/sqlite/` are embedded at compile time and applied
//! in filename order on startup.
//!
//! ```text
//! Store::open
//!      │
//!      ▼
//! _sqlx_migrations ──► 001_kv_snapshots.sql ✓ ──► (next NNN_*.sql) ⬜
//! ```
//!
//! Never edit an applied migration; add a new `NNN_description.sql` instead.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies all pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
