//! Cookie helpers
//!
//! The only cookie this backend sets is the HttpOnly device id; these
//! helpers build its `Set-Cookie` value and read cookies back.

use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};
use std::fmt::{self, Write as _};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

/// Attributes of an HttpOnly cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    /// Session cookie when `None`
    pub max_age: Option<Duration>,
}

impl CookieSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: true,
            same_site: SameSite::default(),
            path: "/".to_string(),
            max_age: None,
        }
    }

    /// `Set-Cookie` value carrying `value`
    pub fn header_value(&self, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!("{}={}; HttpOnly", self.name, value);
        if self.secure {
            cookie.push_str("; Secure");
        }
        // Writing into a String cannot fail
        let _ = write!(cookie, "; SameSite={}; Path={}", self.same_site, self.path);
        if let Some(max_age) = self.max_age {
            let _ = write!(cookie, "; Max-Age={}", max_age.as_secs());
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Value of the first cookie called `name`, across all `Cookie` headers
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_attributes() {
        let spec = CookieSpec {
            same_site: SameSite::Strict,
            max_age: Some(Duration::from_secs(86_400)),
            ..CookieSpec::new("device_id")
        };
        let value = spec.header_value("abc").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "device_id=abc; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=86400"
        );
    }

    #[test]
    fn test_insecure_session_cookie() {
        let spec = CookieSpec {
            secure: false,
            ..CookieSpec::new("device_id")
        };
        let value = spec.header_value("abc").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "device_id=abc; HttpOnly; SameSite=Lax; Path=/"
        );
    }

    #[test]
    fn test_header_value_rejects_control_chars() {
        assert!(CookieSpec::new("device_id").header_value("bad\nvalue").is_err());
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; lang=ja"));
        headers.append(header::COOKIE, HeaderValue::from_static("device_id=abc123"));

        assert_eq!(read_cookie(&headers, "device_id"), Some("abc123"));
        assert_eq!(read_cookie(&headers, "lang"), Some("ja"));
        assert_eq!(read_cookie(&headers, "device"), None);
        assert_eq!(read_cookie(&HeaderMap::new(), "device_id"), None);
    }
}
