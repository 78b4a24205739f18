//! # Auth Commands
//!
//! ```text
//! login(username, password)
//!    │
//!    ├── blank field? ──► VALIDATION_ERROR (no request)
//!    ├── POST /auth ──► { token, user }       401 ──► UNAUTHORIZED
//!    ├── HttpClient keeps the bearer token
//!    ├── SessionState.sign_in ──► current_user + new pos_session
//!    └── query cache cleared (data is per user)
//!
//! logout ──► token dropped, session closed, cache cleared
//! ```

use rueda_core::User;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CommandError, CommandResult};
use crate::state::{ApiState, PosSession, SessionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub session: PosSession,
}

pub async fn login(
    api: &ApiState,
    session: &SessionState,
    username: &str,
    password: &str,
) -> CommandResult<LoginResponse> {
    let username = username.trim();
    debug!(username = %username, "login command");

    if username.is_empty() {
        return Err(CommandError::validation("username is required"));
    }
    if password.is_empty() {
        return Err(CommandError::validation("password is required"));
    }

    let response = api.client().login(username, password).await.map_err(|e| {
        if e.is_unauthorized() {
            CommandError::unauthorized("Invalid username or password")
        } else {
            e.into()
        }
    })?;

    let pos = match session.sign_in(response.user.clone(), response.token).await {
        Ok(pos) => pos,
        Err(e) => {
            api.client().logout();
            return Err(e.into());
        }
    };
    api.cache().invalidate_all();

    info!(username = %response.user.username, role = %response.user.role, "Logged in");
    Ok(LoginResponse {
        user: response.user,
        session: pos,
    })
}

/// Ends the login. Returns the closed POS session with its totals.
pub async fn logout(api: &ApiState, session: &SessionState) -> CommandResult<Option<PosSession>> {
    debug!("logout command");

    api.client().logout();
    let closed = session.sign_out().await?;
    api.cache().invalidate_all();

    Ok(closed)
}

pub async fn current_user(session: &SessionState) -> Option<User> {
    debug!("current_user command");
    session.current_user().await
}
