//! Domain error types for PrintRelay.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Every variant renders as a JSON [`ErrorResponse`] so no failure reaches the
//! client as a bare status line.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use std::fmt;

use crate::services::printer_store::StoreError;
use crate::services::spooler::SpoolerError;

/// Message returned when the copy count is out of range.
pub const INVALID_COPIES_MESSAGE: &str = "Copies must be between 1 and 999";

/// Message returned when no printer has been selected yet.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "No printer configured. Please configure a printer first using /api/config";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required part of the request is absent
    #[error("{0}")]
    MissingInput(String),

    /// Invalid input data
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown route
    #[error("{0}")]
    NotFound(String),

    /// Copy count outside 1..=999
    #[error("{}", INVALID_COPIES_MESSAGE)]
    InvalidCopies,

    /// No printer selected in the configuration store
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    /// Upload exceeded the configured size limit
    #[error("File exceeds the upload limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The spooler could not be started or rejected the job
    #[error("Print command failed: {0}")]
    ExecutionFailed(String),

    /// Printer configuration store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Human-readable `error` field and optional `message` detail for the response body.
    fn body_parts(&self) -> (String, Option<String>) {
        match self {
            AppError::MissingInput(msg) | AppError::InvalidInput(msg) => (msg.clone(), None),
            AppError::NotFound(msg) => ("Not found".to_string(), Some(msg.clone())),
            AppError::InvalidCopies | AppError::NotConfigured => (self.to_string(), None),
            AppError::PayloadTooLarge { .. } => ("File too large".to_string(), Some(self.to_string())),
            AppError::ExecutionFailed(detail) => {
                ("Failed to print document".to_string(), Some(detail.clone()))
            }
            AppError::Storage(detail) => (
                "Printer configuration storage error".to_string(),
                Some(detail.clone()),
            ),
            AppError::Internal(detail) => {
                ("Internal server error".to_string(), Some(detail.clone()))
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidCopies
            | AppError::NotConfigured => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ExecutionFailed(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let (error, message) = self.body_parts();
        HttpResponse::build(status).json(ErrorResponse { error, message })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.error, message),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Render JSON extractor failures as [`AppError::InvalidInput`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(format!("Invalid JSON body: {}", err)).into()
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<SpoolerError> for AppError {
    fn from(err: SpoolerError) -> Self {
        AppError::ExecutionFailed(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::InvalidInput(format!("Multipart error: {}", err))
    }
}
