//! # Command Error Type
//!
//! Unified error type for shell commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Rueda POS                              │
//! │                                                                         │
//! │  Caller                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  add_to_cart(...)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, CommandError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend down? ──── ApiError::ConnectionFailed ──┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Rule broken? ───── CoreError::InsufficientStock ── CommandError►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Snapshot write? ── StoreError::QueryFailed ─────┘               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock for Casco LS2: available 3, ..." }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule failures keep the domain message verbatim; the UI shows it
//! as-is.

use rueda_api::ApiError;
use rueda_core::{CoreError, ValidationError};
use rueda_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Result alias for command functions.
pub type CommandResult<T> = Result<T, CommandError>;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct CommandError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Backend answered 404
    NotFound,

    /// Input rejected before any network call
    ValidationError,

    /// Local snapshot store failed
    StoreError,

    /// Backend unreachable, timed out or answered 5xx
    Network,

    /// Business rule violated (empty cart, client required, ...)
    BusinessLogic,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Logged-in role lacks the permission
    PermissionDenied,

    /// No session or the backend rejected the token
    Unauthorized,

    /// Anything else
    Internal,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CommandError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Internal, message)
    }

    /// For lookups by id: a backend 404 becomes "<resource> not found: <id>".
    pub fn from_lookup(err: ApiError, resource: &str, id: &str) -> Self {
        if err.is_not_found() {
            CommandError::not_found(resource, id)
        } else {
            err.into()
        }
    }
}

/// Converts core errors to command errors.
impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } | CoreError::OutOfStock { .. } => {
                ErrorCode::InsufficientStock
            }
            CoreError::NotInCart(_) => ErrorCode::NotFound,
            CoreError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            CoreError::Validation(e) => return CommandError::from(e.clone()),
            CoreError::EmptyCart
            | CoreError::ClientRequired
            | CoreError::InvalidBalanceAdjustment { .. } => ErrorCode::BusinessLogic,
        };
        CommandError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::validation(err.to_string())
    }
}

/// Converts store errors to command errors.
impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!("Snapshot store failed: {}", err);
        let message = match err {
            StoreError::ConnectionFailed(_) => "Local store unavailable",
            StoreError::MigrationFailed(_) => "Local store migration failed",
            StoreError::PoolExhausted => "Local store busy",
            StoreError::QueryFailed(_) | StoreError::Serialization(_) | StoreError::Internal(_) => {
                "Local store operation failed"
            }
        };
        CommandError::new(ErrorCode::StoreError, message)
    }
}

/// Converts backend errors to command errors.
impl From<ApiError> for CommandError {
    fn from(err: ApiError) -> Self {
        let code = match err.status() {
            Some(404) => ErrorCode::NotFound,
            Some(401) => ErrorCode::Unauthorized,
            Some(403) => ErrorCode::PermissionDenied,
            Some(400) | Some(409) | Some(422) => ErrorCode::ValidationError,
            Some(_) => ErrorCode::Network,
            None if err.is_network() => ErrorCode::Network,
            None if err.is_config_error() => ErrorCode::ValidationError,
            None => ErrorCode::Internal,
        };
        if code == ErrorCode::Internal || code == ErrorCode::Network {
            tracing::warn!(error = %err, "Backend request failed");
        }
        CommandError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_message() {
        let err: CommandError = CoreError::InsufficientStock {
            product_id: "7".to_string(),
            name: "Casco LS2".to_string(),
            available: 3,
            requested: 4,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(
            err.message,
            "Insufficient stock for Casco LS2: available 3, requested 4"
        );

        let err: CommandError = CoreError::ClientRequired.into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_wrapped_validation_is_unwrapped() {
        let err: CommandError = CoreError::Validation(ValidationError::required("sku")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "sku is required");
    }

    #[test]
    fn test_api_status_mapping() {
        let status = |status: u16| ApiError::Status {
            status,
            status_text: String::new(),
            body: String::new(),
        };
        assert_eq!(CommandError::from(status(404)).code, ErrorCode::NotFound);
        assert_eq!(CommandError::from(status(401)).code, ErrorCode::Unauthorized);
        assert_eq!(CommandError::from(status(422)).code, ErrorCode::ValidationError);
        assert_eq!(CommandError::from(status(503)).code, ErrorCode::Network);
        assert_eq!(CommandError::from(ApiError::Timeout).code, ErrorCode::Network);
    }

    #[test]
    fn test_serialized_shape() {
        let err = CommandError::not_found("Product", "42");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 42");
    }
}
