//! # HTTP Transport
//!
//! JSON requests against the backend with an optional bearer token.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(path) ───► send ──► 2xx ──► decode JSON ──► Ok(T)                 │
//! │                   │                                                     │
//! │                   ├──► connect error / timeout / 5xx                   │
//! │                   │        │                                            │
//! │                   │        ├── attempts left? sleep(backoff) ──► send  │
//! │                   │        └── no ──► Err                               │
//! │                   │                                                     │
//! │                   └──► 4xx ──► Err(Status) (never retried)             │
//! │                                                                         │
//! │  post / put / delete ──► send once ──► Ok(T) | Err                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, RwLock};
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{validate_base_url, ApiConfig, RetrySettings};
use crate::error::{ApiError, ApiResult};

/// Shared HTTP client. Clones share the token and base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Arc<RwLock<String>>,
    token: Arc<RwLock<Option<String>>>,
    retry: RetrySettings,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(HttpClient {
            client,
            base_url: Arc::new(RwLock::new(config.base_url().to_string())),
            token: Arc::new(RwLock::new(None)),
            retry: config.retry.clone(),
        })
    }

    // =========================================================================
    // Base URL & Token
    // =========================================================================

    pub fn base_url(&self) -> String {
        self.base_url
            .read()
            .map(|url| url.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Points all clones at a different backend.
    pub fn set_base_url(&self, url: &str) -> ApiResult<()> {
        validate_base_url(url)?;
        let mut guard = self.base_url.write().unwrap_or_else(|p| p.into_inner());
        *guard = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .map(|t| t.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        request
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET with retry on transient failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let mut backoff = self.create_backoff();
        let mut attempt = 0u32;

        loop {
            debug!(path = %path, attempt, "GET");
            let result = match self.request(Method::GET, path).send().await {
                Ok(response) => Self::handle_response(response).await,
                Err(err) => Err(ApiError::from(err)),
            };

            match result {
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(err);
                    };
                    attempt += 1;
                    warn!(path = %path, attempt, ?delay, error = %err, "GET failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path = %path, "POST");
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path = %path, "POST");
        let response = self.request(Method::POST, path).send().await?;
        Self::handle_response(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path = %path, "PUT");
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// DELETE; the response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        debug!(path = %path, "DELETE");
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    // =========================================================================
    // Response Handling
    // =========================================================================

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        // Some write endpoints answer 204 / empty body
        if bytes.is_empty() {
            return serde_json::from_str("null").map_err(ApiError::from);
        }
        serde_json::from_slice(&bytes).map_err(ApiError::from)
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_millis(self.retry.initial_backoff_ms),
            max_interval: Duration::from_millis(self.retry.max_backoff_ms),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, spawn_backend};
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Hits(Arc<AtomicUsize>);

    async fn flaky(State(hits): State<Hits>) -> (StatusCode, Json<Value>) {
        let n = hits.0.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "busy"})))
        } else {
            (StatusCode::OK, Json(json!({"ok": true})))
        }
    }

    async fn always_down(State(hits): State<Hits>) -> StatusCode {
        hits.0.fetch_add(1, Ordering::SeqCst);
        StatusCode::BAD_GATEWAY
    }

    async fn not_found(State(hits): State<Hits>) -> StatusCode {
        hits.0.fetch_add(1, Ordering::SeqCst);
        StatusCode::NOT_FOUND
    }

    async fn whoami(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({ "auth": auth }))
    }

    fn router(hits: Hits) -> Router {
        Router::new()
            .route("/flaky", get(flaky).post(flaky))
            .route("/down", get(always_down))
            .route("/missing", get(not_found))
            .route("/whoami", get(whoami))
            .with_state(hits)
    }

    #[tokio::test]
    async fn test_get_retries_transient_failures() {
        let hits = Hits::default();
        let base = spawn_backend(router(hits.clone())).await;
        let client = client_for(&base, 2);

        let value: Value = client.get("/flaky").await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(hits.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_get_gives_up_after_max_retries() {
        let hits = Hits::default();
        let base = spawn_backend(router(hits.clone())).await;
        let client = client_for(&base, 2);

        let err = client.get::<Value>("down").await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(hits.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let hits = Hits::default();
        let base = spawn_backend(router(hits.clone())).await;
        let client = client_for(&base, 2);

        let err = client.get::<Value>("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(hits.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_writes_are_not_retried() {
        let hits = Hits::default();
        let base = spawn_backend(router(hits.clone())).await;
        let client = client_for(&base, 2);

        let err = client.post::<Value, _>("flaky", &json!({})).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(hits.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bearer_token_shared_between_clones() {
        let base = spawn_backend(router(Hits::default())).await;
        let client = client_for(&base, 0);
        let clone = client.clone();

        client.set_token(Some("abc123".to_string()));
        let value: Value = clone.get("whoami").await.unwrap();
        assert_eq!(value["auth"], "Bearer abc123");

        client.set_token(None);
        let value: Value = clone.get("whoami").await.unwrap();
        assert_eq!(value["auth"], "");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = client_for("http://127.0.0.1:9", 0);
        let err = client.get::<Value>("products").await.unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_set_base_url_validates() {
        let client = client_for("http://localhost:3001/api", 0);
        assert!(client.set_base_url("localhost:3001").is_err());
        client.set_base_url("http://10.0.0.2:3001/api/").unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.2:3001/api");
    }
}
