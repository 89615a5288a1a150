//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `InvalidReference`, `InvalidSlug` → 400
//! - `NotFound` → 404
//! - `RateLimited` → 429
//! - `Upstream` → 502

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::github::HostError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid GitHub reference: {0}")]
    InvalidReference(String),

    #[error("Invalid path format: {0}")]
    InvalidSlug(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub rate limit exhausted")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotFound => AppError::NotFound("branch or file".to_string()),
            HostError::RateLimited => AppError::RateLimited,
            HostError::Transient(status) => {
                AppError::Upstream(format!("transient upstream status {}", status))
            }
            HostError::Service(msg) => AppError::Upstream(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidReference(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid GitHub reference: {}", msg),
            ),
            AppError::InvalidSlug(slug) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid path format: {}", slug),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "GitHub rate limit exhausted".to_string(),
            ),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
