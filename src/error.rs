//! Error types for the Summary Gateway

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for every transport failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned when the body is not JSON of the expected shape
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad client input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream answered with a non-success status
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The upstream could not be reached or its reply could not be read.
    /// The detail is logged, never returned.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Unreadable request body: {}", rejection.body_text());
        Self::Validation(INVALID_BODY_MESSAGE.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                msg
            }
            AppError::Upstream { message, .. } => message,
            AppError::Transport(detail) => {
                tracing::error!("Transport error: {}", detail);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Turn a handler panic into a transport error response
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Transport(format!("handler panicked: {}", detail)).into_response()
}
