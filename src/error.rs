// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every error reaches the browser as `{ "message": ..., "errors": ... }`.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid authentication")]
    InvalidAuthentication,

    #[error("Backend returned {status}: {message}")]
    Upstream {
        status: StatusCode,
        message: String,
        errors: Option<Value>,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Request body rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message returned when the session cannot be (re)established.
    pub const INVALID_AUTHENTICATION: &'static str = "احراز هویت نامعتبر است";

    /// Message used when a backend error body carries no usable message.
    pub const UPSTREAM_FALLBACK: &'static str = "خطا در برقراری ارتباط با سرور";

    /// Message returned for local failures.
    pub const INTERNAL: &'static str = "خطای داخلی سرور";

    /// Build an error from a non-2xx backend response body.
    ///
    /// `message` and `errors` are copied from a JSON object body; anything
    /// else falls back to [`AppError::UPSTREAM_FALLBACK`].
    pub fn upstream(status: StatusCode, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<Value>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(Self::UPSTREAM_FALLBACK)
            .to_string();

        let errors = parsed
            .as_ref()
            .and_then(|v| v.get("errors"))
            .filter(|e| !e.is_null())
            .cloned();

        AppError::Upstream {
            status,
            message,
            errors,
        }
    }

    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidAuthentication => StatusCode::UNAUTHORIZED,
            AppError::Upstream { status, .. } => *status,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Transport(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            AppError::InvalidAuthentication => (Self::INVALID_AUTHENTICATION.to_string(), None),
            AppError::Upstream {
                message, errors, ..
            } => (message, errors),
            AppError::BadRequest(msg) => (msg, None),
            AppError::Rejected { message, .. } => (message, None),
            AppError::Transport(err) => {
                tracing::error!(error = %err, "Backend request failed");
                (Self::INTERNAL.to_string(), None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (Self::INTERNAL.to_string(), None)
            }
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
