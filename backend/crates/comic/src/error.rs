//! Comic Error Types
//!
//! Generation failures surface to the browser as `{"error": "..."}`;
//! upstream details are logged but never echoed back.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ComicResult<T> = Result<T, ComicError>;

const UPSTREAM_MESSAGE: &str = "The generation service failed, please try again later";

#[derive(Debug, Error)]
pub enum ComicError {
    /// Request body failed validation
    #[error("{0}")]
    Validation(String),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// Upstream API answered with an error or unusable payload
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ComicError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ComicError::Validation(_) | ComicError::UnknownStyle(_) => StatusCode::BAD_REQUEST,
            ComicError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ComicError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ComicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ComicError::Validation(_) | ComicError::UnknownStyle(_) => ErrorKind::BadRequest,
            ComicError::Upstream(_) => ErrorKind::BadGateway,
            ComicError::UpstreamTimeout => ErrorKind::GatewayTimeout,
            ComicError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to the user
    pub fn public_message(&self) -> String {
        match self {
            ComicError::Validation(_) | ComicError::UnknownStyle(_) => self.to_string(),
            ComicError::Upstream(_) | ComicError::UpstreamTimeout => UPSTREAM_MESSAGE.to_string(),
            ComicError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            ComicError::Upstream(detail) => {
                tracing::error!(detail = %detail, "Generation upstream failed");
            }
            ComicError::UpstreamTimeout => {
                tracing::error!("Generation upstream timed out");
            }
            ComicError::Internal(msg) => {
                tracing::error!(message = %msg, "Comic internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Rejected generation request");
            }
        }
    }
}

impl From<ComicError> for AppError {
    fn from(err: ComicError) -> Self {
        AppError::new(err.kind(), err.public_message())
    }
}

impl From<reqwest::Error> for ComicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ComicError::UpstreamTimeout
        } else {
            ComicError::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for ComicError {
    fn into_response(self) -> Response {
        self.log();
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status_code(), Json(body)).into_response()
    }
}
