//! HTTP-facing error type.
//!
//! Domain errors convert into [`AppError`] with `?`; the response body is
//! always `{"error": {"code", "message", "details"}}` where `details.kind`
//! names the exact failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::errors::{CreationError, NotFoundError, ResolutionError};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Gone { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Gone { .. } => StatusCode::GONE,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Gone { message, details } => ("gone", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<CreationError> for AppError {
    fn from(e: CreationError) -> Self {
        let message = e.to_string();
        match e {
            CreationError::EmptyBatch => {
                AppError::bad_request(message, json!({ "kind": "empty_batch" }))
            }
            CreationError::InvalidUrl(url) => {
                AppError::bad_request(message, json!({ "kind": "invalid_url", "url": url }))
            }
            CreationError::DuplicateCustomCode(code) => AppError::bad_request(
                message,
                json!({ "kind": "duplicate_custom_code", "code": code }),
            ),
            CreationError::CodeAlreadyExists(code) => AppError::conflict(
                message,
                json!({ "kind": "code_already_exists", "code": code }),
            ),
            CreationError::ReservedCode(code) => {
                AppError::bad_request(message, json!({ "kind": "reserved_code", "code": code }))
            }
        }
    }
}

impl From<ResolutionError> for AppError {
    fn from(e: ResolutionError) -> Self {
        let message = e.to_string();
        match e {
            ResolutionError::NotFound(code) => {
                AppError::not_found(message, json!({ "kind": "not_found", "code": code }))
            }
            ResolutionError::Expired(code) => {
                AppError::gone(message, json!({ "kind": "expired", "code": code }))
            }
        }
    }
}

impl From<NotFoundError> for AppError {
    fn from(e: NotFoundError) -> Self {
        AppError::not_found(e.to_string(), json!({ "kind": "not_found", "id": e.0 }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            json!({ "kind": "invalid_request", "fields": e }),
        )
    }
}
