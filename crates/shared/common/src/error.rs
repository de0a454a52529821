//! Unified error handling for the catalog services.
//!
//! Every failure, whether raised by a handler, a repository or the global
//! boundary, is rendered as the same structured body:
//!
//! ```json
//! {"error": {"status": 404, "code": "NOT_FOUND", "message": "...", "detail": "..."}}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    // Validation
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Persistence
    #[error("No rows affected: {0}")]
    PersistenceNoOp(String),

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Request lifecycle
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out")]
    Timeout,

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::PersistenceNoOp(_) => "PERSISTENCE_NO_OP",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Cancelled => "CANCELLED",
            AppError::Timeout => "TIMEOUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::PreconditionFailed(_)
            | AppError::BadRequest(_)
            | AppError::PersistenceNoOp(_) => StatusCode::BAD_REQUEST,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::PreconditionFailed(_) => "Precondition failed".to_string(),
            AppError::BadRequest(_) => "Invalid input".to_string(),
            AppError::PersistenceNoOp(_) => "No changes were saved".to_string(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            AppError::Cancelled => "The request was cancelled".to_string(),
            AppError::Timeout => "The request timed out".to_string(),
        }
    }

    /// Client-safe specifics for the failure, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::NotFound(what)
            | AppError::Validation(what)
            | AppError::PreconditionFailed(what)
            | AppError::BadRequest(what)
            | AppError::PersistenceNoOp(what) => Some(what.clone()),
            _ => None,
        }
    }

    /// Build the structured body for this error.
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                status: self.status().as_u16(),
                code: self.code().to_string(),
                message: self.user_message(),
                detail: self.detail(),
            },
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Projection(msg) => AppError::Internal(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();

        if messages.is_empty() {
            AppError::Validation("Invalid input".to_string())
        } else {
            AppError::Validation(messages.join("; "))
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, what: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, what: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(what.into()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn precondition_failed(msg: impl Into<String>) -> Self {
        AppError::PreconditionFailed(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn persistence_no_op(msg: impl Into<String>) -> Self {
        AppError::PersistenceNoOp(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
