//! Application error taxonomy and HTTP mapping.
//!
//! Services return a tagged [`AppError`] kind instead of surfacing their
//! internal failures; the HTTP layer performs a total mapping over the
//! enumeration. Client-visible messages stay generic — detail goes to the
//! structured log, never over the wire.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorInfo,
}

/// Wire representation of an error, embeddable in partial-success payloads.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Failure kinds produced by services and stores.
///
/// Two-tier taxonomy: data/validation problems map to 4xx, dependency and
/// environment problems map to 5xx. See `DESIGN.md` for the rationale.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or out-of-range input. HTTP 400.
    Validation { message: String, details: Value },
    /// Requested entity does not exist. HTTP 404.
    NotFound { message: String, details: Value },
    /// Missing or invalid credentials. HTTP 401 with `WWW-Authenticate`.
    Unauthorized { message: String, details: Value },
    /// A collaborator (docker CLI, data directory, cache) is unavailable.
    /// HTTP 500 with a generic "service error" message.
    ServiceUnavailable { message: String, details: Value },
    /// Unexpected internal failure. HTTP 500.
    Internal { message: String, details: Value },
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
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Converts into the embeddable wire form without consuming HTTP status.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::ServiceUnavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };
        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::ServiceUnavailable { message, .. }
            | AppError::Internal { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_else(|_| json!({})),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::ServiceUnavailable { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "service_unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            success: false,
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"DDC Control Panel\""),
            );
        }
        response
    }
}

/// Maps an I/O failure from a store into the dependency tier.
pub fn map_io_error(context: &str, e: std::io::Error) -> AppError {
    tracing::error!("I/O error in {context}: {e}");
    AppError::service_unavailable(
        "Service error: storage unavailable",
        json!({ "context": context }),
    )
}
