//! # Snapshot Repository
//!
//! Whole-value reads and writes of JSON blobs keyed by name.
//!
//! Blobs carry no version. A blob that no longer decodes into the requested
//! type is logged and reported as absent, so the caller starts from its
//! default state instead of failing.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::StoreResult;

/// Well-known snapshot keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Cart,
    PosSession,
    DbConfig,
    ExchangeRates,
    CurrentUser,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 5] = [
        SnapshotKey::Cart,
        SnapshotKey::PosSession,
        SnapshotKey::DbConfig,
        SnapshotKey::ExchangeRates,
        SnapshotKey::CurrentUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKey::Cart => "cart",
            SnapshotKey::PosSession => "pos_session",
            SnapshotKey::DbConfig => "db_config",
            SnapshotKey::ExchangeRates => "exchange_rates_enhanced",
            SnapshotKey::CurrentUser => "current_user",
        }
    }
}

impl AsRef<str> for SnapshotKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Repository for the `kv_snapshots` table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.snapshots();
/// repo.put_json(SnapshotKey::ExchangeRates, &rates).await?;
/// let rates: ExchangeRates = repo.get_json(SnapshotKey::ExchangeRates).await?.unwrap_or_default();
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Raw JSON text stored under `key`.
    pub async fn get(&self, key: impl AsRef<str>) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_snapshots WHERE key = ?1")
                .bind(key.as_ref())
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Inserts or replaces the value under `key`.
    pub async fn put(&self, key: impl AsRef<str>, value: &str) -> StoreResult<()> {
        let key = key.as_ref();
        debug!(key = %key, bytes = value.len(), "Writing snapshot");

        sqlx::query(
            r#"
            INSERT INTO kv_snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether a row existed.
    pub async fn remove(&self, key: impl AsRef<str>) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM kv_snapshots WHERE key = ?1")
            .bind(key.as_ref())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> StoreResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_snapshots ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }

    /// Decodes the value under `key`. Undecodable blobs yield `Ok(None)`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> StoreResult<Option<T>> {
        let key = key.as_ref();
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key = %key, error = %err, "Ignoring undecodable snapshot");
                Ok(None)
            }
        }
    }

    pub async fn put_json<T: Serialize>(&self, key: impl AsRef<str>, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
