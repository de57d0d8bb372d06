/// Error types for geo-content-service
///
/// Every data-layer operation returns [`Result`]; nothing in the core panics
/// on a storage outcome. Handlers convert [`AppError`] into an HTTP response
/// through `ResponseError`.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for geo-content-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// SQLSTATE for `unique_violation`
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Application error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or missing request fields, bad watermark
    #[error("Validation error: {0}")]
    Validation(String),

    /// No authenticated user on the request
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Lookup by identifier returned nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Concurrent write lost a race (duplicate like)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection, query, transaction or timeout failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} not found", resource, id))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // storage details stay in the logs
        let error_msg = match self {
            AppError::Storage(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        };
        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", error_msg);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                AppError::Conflict(format!("concurrent write rejected: {}", db_err.message()))
            }
            _ => AppError::Storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("invalid json format: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
