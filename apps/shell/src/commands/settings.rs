//! # Settings Commands
//!
//! Backend connection. Not permission-guarded: the URL has to be set before
//! anyone can log in.

use tracing::{debug, info};

use crate::error::CommandResult;
use crate::state::{ApiState, ConnectionSettings, StoreState};

/// Base URL currently in use.
pub fn get_api_url(api: &ApiState) -> String {
    debug!("get_api_url command");
    api.client().base_url()
}

/// Points the client at another backend and saves it under `db_config`.
///
/// The URL must be absolute http(s). Cached queries from the old backend
/// are dropped.
pub async fn set_api_url(api: &ApiState, store: &StoreState, url: &str) -> CommandResult<String> {
    let url = url.trim();
    debug!(url = %url, "set_api_url command");

    api.client().set_base_url(url)?;
    let api_url = api.client().base_url();
    store
        .save_connection_settings(&ConnectionSettings {
            api_url: api_url.clone(),
        })
        .await?;
    api.cache().invalidate_all();

    info!(url = %api_url, "API URL changed");
    Ok(api_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::app_with;
    use axum::Router;

    #[tokio::test]
    async fn test_set_api_url_persists_normalized() {
        let app = app_with(Router::new()).await;

        let url = set_api_url(&app.api, &app.store, " https://pos.rueda.com.ve/api/ ")
            .await
            .unwrap();
        assert_eq!(url, "https://pos.rueda.com.ve/api");
        assert_eq!(get_api_url(&app.api), url);

        let saved = app.store.connection_settings().await.unwrap().unwrap();
        assert_eq!(saved.api_url, url);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let app = app_with(Router::new()).await;
        let before = get_api_url(&app.api);

        let err = set_api_url(&app.api, &app.store, "ftp://pos.local").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_api_url(&app.api), before);
        assert!(app.store.connection_settings().await.unwrap().is_none());
    }
}
