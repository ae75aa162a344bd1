//! Client identification utilities
//!
//! Device traits are read from HTTP headers. The browser front-end sends its
//! screen geometry, colour depth and timezone offset alongside the
//! User-Agent so the backend can rebuild the same weak fingerprint on every
//! request.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

pub const SCREEN_HEADER: &str = "x-device-screen";
pub const COLOR_DEPTH_HEADER: &str = "x-device-color-depth";
pub const TIMEZONE_OFFSET_HEADER: &str = "x-device-timezone-offset";

/// Browser/display characteristics of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTraits {
    pub user_agent: String,
    /// `(width, height)` in CSS pixels
    pub screen: Option<(u32, u32)>,
    pub color_depth: Option<u8>,
    /// Minutes, same sign convention as JavaScript `getTimezoneOffset()`
    pub timezone_offset_minutes: Option<i32>,
}

impl DeviceTraits {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            screen: None,
            color_depth: None,
            timezone_offset_minutes: None,
        }
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some((width, height));
        self
    }

    pub fn with_color_depth(mut self, depth: u8) -> Self {
        self.color_depth = Some(depth);
        self
    }

    pub fn with_timezone_offset(mut self, minutes: i32) -> Self {
        self.timezone_offset_minutes = Some(minutes);
        self
    }

    /// Reproducible fingerprint string: `ua|WxH|depth|offset`.
    ///
    /// Missing traits contribute an empty segment so the layout stays stable.
    pub fn fingerprint(&self) -> String {
        let screen = self
            .screen
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_default();
        let depth = self.color_depth.map(|d| d.to_string()).unwrap_or_default();
        let offset = self
            .timezone_offset_minutes
            .map(|o| o.to_string())
            .unwrap_or_default();
        format!("{}|{}|{}|{}", self.user_agent, screen, depth, offset)
    }
}

/// Error when extracting device traits
#[derive(Debug, Clone, thiserror::Error)]
pub enum FingerprintError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
}

/// Extract device traits from request headers
///
/// `User-Agent` is required. The `x-device-*` headers are optional but must
/// parse when present.
pub fn extract_device_traits(headers: &HeaderMap) -> Result<DeviceTraits, FingerprintError> {
    let user_agent = header_str(headers, header::USER_AGENT.as_str())
        .ok_or_else(|| FingerprintError::MissingHeader("User-Agent".to_string()))?;

    let screen = header_str(headers, SCREEN_HEADER)
        .map(|raw| {
            parse_screen(raw).ok_or_else(|| FingerprintError::MalformedHeader(SCREEN_HEADER.into()))
        })
        .transpose()?;

    let color_depth = header_str(headers, COLOR_DEPTH_HEADER)
        .map(|raw| {
            raw.trim()
                .parse::<u8>()
                .map_err(|_| FingerprintError::MalformedHeader(COLOR_DEPTH_HEADER.into()))
        })
        .transpose()?;

    let timezone_offset_minutes = header_str(headers, TIMEZONE_OFFSET_HEADER)
        .map(|raw| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| FingerprintError::MalformedHeader(TIMEZONE_OFFSET_HEADER.into()))
        })
        .transpose()?;

    Ok(DeviceTraits {
        user_agent: user_agent.to_string(),
        screen,
        color_depth,
        timezone_offset_minutes,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_screen(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For first (reverse proxy setups), then falls back to
/// the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = header_str(headers, "x-forwarded-for") {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
