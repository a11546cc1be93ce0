use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ContactError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Store connection failed: {0}")]
    Connect(String),

    #[error("Store unreachable after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("Store connection cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Relay error ({service}): {message}")]
    Relay { service: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, ContactError>;

impl From<std::io::Error> for ContactError {
    fn from(e: std::io::Error) -> Self {
        ContactError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ContactError {
    fn from(e: serde_json::Error) -> Self {
        ContactError::Json(e.to_string())
    }
}

impl From<reqwest::Error> for ContactError {
    fn from(e: reqwest::Error) -> Self {
        ContactError::Store(e.to_string())
    }
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MissingField(_) => StatusCode::BAD_REQUEST,
            ContactError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            ContactError::Json(_) => StatusCode::BAD_REQUEST,
            ContactError::Connect(_) => StatusCode::SERVICE_UNAVAILABLE,
            ContactError::ExhaustedRetries { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ContactError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ContactError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::Relay { .. } => StatusCode::BAD_GATEWAY,
            ContactError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for the one error the process cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ContactError::ExhaustedRetries { .. })
    }
}

#[cfg(feature = "axum-support")]
use axum::response::{IntoResponse, Json, Response};
#[cfg(feature = "axum-support")]
use serde::Serialize;

#[cfg(feature = "axum-support")]
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(feature = "axum-support")]
impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message, suggestion) = match &self {
            ContactError::MissingField(field) => (
                "missing_field",
                format!("Required field '{}' is missing", field),
                Some("Fill in name, email, phone and message".to_string()),
            ),
            ContactError::InvalidField { field, reason } => (
                "invalid_field",
                format!("Field '{}' is invalid: {}", field, reason),
                None,
            ),
            ContactError::Json(e) => ("json_error", format!("JSON error: {}", e), None),
            ContactError::Connect(e) => (
                "store_unavailable",
                format!("Store connection failed: {}", e),
                Some("Retry after a short delay".to_string()),
            ),
            ContactError::ExhaustedRetries { attempts, .. } => (
                "store_unavailable",
                format!("Store unreachable after {} attempts", attempts),
                None,
            ),
            ContactError::Cancelled { .. } => (
                "store_unavailable",
                "Store connection was cancelled".to_string(),
                None,
            ),
            // Store and relay internals are logged, not echoed to form users.
            ContactError::Store(_) => (
                "store_error",
                "Could not save the submission".to_string(),
                Some("Retry after a short delay".to_string()),
            ),
            ContactError::Relay { service, .. } => (
                "relay_error",
                format!("Submission saved but the {} relay failed", service),
                None,
            ),
            ContactError::Config(e) => (
                "config_error",
                format!("Configuration error: {}", e),
                None,
            ),
            ContactError::Io(e) => ("io_error", format!("IO error: {}", e), None),
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message,
            request_id: format!("req_cd_{}", uuid::Uuid::new_v4()),
            suggestion,
        };

        (status, Json(error_response)).into_response()
    }
}
