//! # Session State
//!
//! Who is logged in, and the POS shift they opened.
//!
//! ```text
//!  login ──► sign_in(user, token) ──► current_user  ◄── require(Permission)
//!                    │                     (persisted)
//!                    └──► PosSession { sales_count: 0, sales_total: $0 }
//!                                          (persisted)
//!  checkout ──► record_sale(total) ──► sales_count + 1, sales_total + total
//!
//!  logout ──► sign_out() ──► both snapshots removed
//! ```
//!
//! Both snapshots survive a restart, so a crash mid-shift keeps the cashier
//! logged in with their running totals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rueda_core::{Money, Permission, User};
use rueda_store::{SnapshotKey, SnapshotRepository, StoreResult};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CommandError, CommandResult};

/// Persisted under `current_user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub user: User,
    pub token: String,
}

/// A cashier's shift, persisted under `pos_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosSession {
    pub id: String,
    pub cashier_id: String,
    pub cashier_name: String,
    pub opened_at: DateTime<Utc>,
    pub sales_count: u32,
    pub sales_total: Money,
}

impl PosSession {
    fn open(user: &User, now: DateTime<Utc>) -> Self {
        PosSession {
            id: Uuid::new_v4().to_string(),
            cashier_id: user.id.clone(),
            cashier_name: user.label().to_string(),
            opened_at: now,
            sales_count: 0,
            sales_total: Money::zero(),
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    auth: Option<AuthSnapshot>,
    pos: Option<PosSession>,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<RwLock<Session>>,
    snapshots: SnapshotRepository,
}

impl SessionState {
    /// Restores the login and shift saved by a previous run.
    pub async fn load(snapshots: SnapshotRepository) -> StoreResult<Self> {
        let auth: Option<AuthSnapshot> = snapshots.get_json(SnapshotKey::CurrentUser).await?;
        let pos: Option<PosSession> = snapshots.get_json(SnapshotKey::PosSession).await?;
        if let Some(auth) = &auth {
            debug!(username = %auth.user.username, "Session restored");
        }

        Ok(SessionState {
            session: Arc::new(RwLock::new(Session { auth, pos })),
            snapshots,
        })
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.auth.as_ref().map(|a| a.user.clone())
    }

    /// Bearer token of the restored or current login.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.auth.as_ref().map(|a| a.token.clone())
    }

    pub async fn pos_session(&self) -> Option<PosSession> {
        self.session.read().await.pos.clone()
    }

    /// Returns the logged-in user if their role grants `permission`.
    ///
    /// ## Errors
    /// - `Unauthorized` when nobody is logged in
    /// - `PermissionDenied` when the role lacks the permission
    pub async fn require(&self, permission: Permission) -> CommandResult<User> {
        let user = self
            .current_user()
            .await
            .ok_or_else(|| CommandError::unauthorized("Login required"))?;
        user.require(permission)?;
        Ok(user)
    }

    /// Stores the login and opens a fresh POS session for the user.
    pub async fn sign_in(&self, user: User, token: String) -> StoreResult<PosSession> {
        let mut session = self.session.write().await;
        let auth = AuthSnapshot { user, token };
        let pos = PosSession::open(&auth.user, Utc::now());

        self.snapshots.put_json(SnapshotKey::CurrentUser, &auth).await?;
        self.snapshots.put_json(SnapshotKey::PosSession, &pos).await?;
        info!(username = %auth.user.username, role = %auth.user.role, session_id = %pos.id, "POS session opened");

        session.auth = Some(auth);
        session.pos = Some(pos.clone());
        Ok(pos)
    }

    /// Forgets the login and closes the POS session, returning it.
    pub async fn sign_out(&self) -> StoreResult<Option<PosSession>> {
        let mut session = self.session.write().await;
        self.snapshots.remove(SnapshotKey::CurrentUser).await?;
        self.snapshots.remove(SnapshotKey::PosSession).await?;

        session.auth = None;
        let closed = session.pos.take();
        if let Some(pos) = &closed {
            info!(
                session_id = %pos.id,
                sales = pos.sales_count,
                total = %pos.sales_total,
                "POS session closed"
            );
        }
        Ok(closed)
    }

    /// Adds a completed sale to the running shift totals.
    pub async fn record_sale(&self, total: Money) -> StoreResult<()> {
        let mut session = self.session.write().await;
        let Some(pos) = session.pos.as_ref() else {
            return Ok(());
        };

        let mut next = pos.clone();
        next.sales_count += 1;
        next.sales_total += total;
        self.snapshots.put_json(SnapshotKey::PosSession, &next).await?;
        session.pos = Some(next);
        Ok(())
    }
}
