//! Error types for songsmith-studio
//!
//! Layer errors (`UpstreamError`, `AssetIoError`, `PollError`,
//! `GenerationError`) converge on `ApiError`, which renders the uniform
//! failure envelope `{success: false, error, details?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use songsmith_common::api::ErrorResponse;
use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to a text or media provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Credential absent when the client was built
    #[error("{0} is not set in environment variables")]
    MissingCredential(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status; `details` is the provider's response body
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl UpstreamError {
    /// Opaque provider diagnostic to surface to the caller
    pub fn details(&self) -> Option<Value> {
        match self {
            UpstreamError::Api { details, .. } => details.clone(),
            _ => None,
        }
    }
}

/// Failure reading, writing or deleting a transient asset
#[derive(Debug, Error)]
#[error("Failed to {operation} {}: {source}", .path.display())]
pub struct AssetIoError {
    pub operation: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl AssetIoError {
    pub fn new(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required field missing or empty, or file type not accepted (400)
    #[error("{0}")]
    Validation(String),

    /// Required credential absent (500)
    #[error("{0}")]
    Configuration(String),

    /// Provider call failed (500)
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<Value>,
    },

    /// Provider reported the generation job as failed (500)
    #[error("{detail}")]
    JobFailed { job_id: String, detail: String },

    /// Poll budget exhausted (500)
    #[error("{0}")]
    JobTimeout(String),

    /// Transient asset I/O failed (500)
    #[error("{0}")]
    AssetIo(#[from] AssetIoError),

    /// Server is shutting down (503)
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Configuration(_)
            | ApiError::Upstream { .. }
            | ApiError::JobFailed { .. }
            | ApiError::JobTimeout(_)
            | ApiError::AssetIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Upstream { details, .. } => details.clone(),
            ApiError::JobFailed { job_id, .. } => Some(serde_json::json!({
                "job_id": job_id,
                "status": "failed",
            })),
            _ => None,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::MissingCredential(_) => ApiError::Configuration(err.to_string()),
            _ => ApiError::Upstream {
                details: err.details(),
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
            details: self.details(),
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
