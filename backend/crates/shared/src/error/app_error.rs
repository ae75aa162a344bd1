//! Application Error
//!
//! [`AppError`] is what every crate-specific error turns into at the HTTP
//! boundary.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Boundary error: a kind, a user-facing message and an optional hint.
///
/// Upstream details never go in `message`; the owning crate logs them
/// before converting.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Forbidden, "Activation required")
///     .with_action("Redeem an activation code");
/// assert_eq!(err.status_code(), 403);
/// assert_eq!(err.action(), Some("Redeem an activation code"));
/// ```
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// What the user can do about it
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("Invalid JSON: {err}"))
        } else {
            AppError::internal("JSON serialization failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::BadGateway, "Generation failed");
        assert_eq!(err.kind(), ErrorKind::BadGateway);
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.message(), "Generation failed");
        assert!(err.action().is_none());
        assert_eq!(err.to_string(), "Bad Gateway: Generation failed");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{broken")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.message().starts_with("Invalid JSON"));
    }
}
