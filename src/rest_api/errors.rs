//! # REST API Errors
//!
//! One mapping from failure to HTTP status:
//! - validation and unchanged writes: 400
//! - missing documents: resolved by the [`StatusPolicy`](super::StatusPolicy) when raised
//! - store faults: 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Payload or path key rejected by the entity schema
    #[error("{}", .0.message())]
    Validation(#[from] SchemaError),

    /// Malformed request outside the schema (bad JSON, form rules)
    #[error("{0}")]
    BadRequest(String),

    /// The document exists but the write changed nothing
    #[error("Failed to {operation} {label}")]
    Unchanged {
        operation: &'static str,
        label: String,
    },

    /// Addressed document does not exist
    #[error("{message}")]
    NotFound { message: String, status: StatusCode },

    /// Backend fault; details go to the log, not the client
    #[error("Internal Server Error")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(label: &str, status: StatusCode) -> Self {
        ApiError::NotFound {
            message: format!("{} not found", label),
            status,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(e) if !e.code().is_client_error() => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unchanged { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { status, .. } => *status,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
