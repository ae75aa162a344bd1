//! Activation Error Types
//!
//! The ledger itself never fails; these errors only exist at the HTTP
//! boundary (bad device headers, gated routes).

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::FingerprintError;
use thiserror::Error;

pub type ActivationResult<T> = Result<T, ActivationError>;

pub const ACTIVATION_REQUIRED_HEADER: &str = "x-activation-required";

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// No valid activation on this device
    #[error("An activation code is required")]
    NotActivated,

    /// Valid activation with zero uses left
    #[error("All uses of the activation code have been spent")]
    Exhausted,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActivationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActivationError::MissingHeader(_) | ActivationError::MalformedHeader(_) => {
                StatusCode::BAD_REQUEST
            }
            ActivationError::NotActivated | ActivationError::Exhausted => StatusCode::FORBIDDEN,
            ActivationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ActivationError::MissingHeader(_) | ActivationError::MalformedHeader(_) => {
                ErrorKind::BadRequest
            }
            ActivationError::NotActivated | ActivationError::Exhausted => ErrorKind::Forbidden,
            ActivationError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn action(&self) -> Option<&'static str> {
        match self {
            ActivationError::NotActivated => Some("Redeem an activation code"),
            ActivationError::Exhausted => Some("Redeem a new activation code"),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            ActivationError::Internal(msg) => {
                tracing::error!(message = %msg, "Activation internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Activation error");
            }
        }
    }
}

impl From<ActivationError> for AppError {
    fn from(err: ActivationError) -> Self {
        let app = AppError::new(err.kind(), err.to_string());
        match err.action() {
            Some(action) => app.with_action(action),
            None => app,
        }
    }
}

impl IntoResponse for ActivationError {
    fn into_response(self) -> Response {
        self.log();
        let gated = matches!(
            self,
            ActivationError::NotActivated | ActivationError::Exhausted
        );
        let mut response = AppError::from(self).into_response();
        if gated {
            response.headers_mut().insert(
                ACTIVATION_REQUIRED_HEADER,
                HeaderValue::from_static("true"),
            );
        }
        response
    }
}

impl From<FingerprintError> for ActivationError {
    fn from(err: FingerprintError) -> Self {
        match err {
            FingerprintError::MissingHeader(header) => ActivationError::MissingHeader(header),
            FingerprintError::MalformedHeader(header) => ActivationError::MalformedHeader(header),
        }
    }
}
