//! Application Configuration
//!
//! Configuration for the activation ledger and its HTTP surface.

use std::time::Duration;

use platform::cookie::CookieSpec;
pub use platform::cookie::SameSite;

pub const DEFAULT_CHECKSUM_SALT: &str = "comic-ledger::v1::4f9c2a";

/// Activation ledger configuration
#[derive(Debug, Clone)]
pub struct ActivationConfig {
    /// How long an activation stays valid after redemption
    pub validity_window: Duration,
    /// Constant mixed into the usage checksum
    pub checksum_salt: String,
    /// Compare-and-swap attempts before `use_once` gives up
    pub max_update_attempts: u32,
    /// Cookie carrying the device id
    pub device_cookie_name: String,
    pub device_cookie_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            validity_window: Duration::from_secs(24 * 3600),
            checksum_salt: DEFAULT_CHECKSUM_SALT.to_string(),
            max_update_attempts: 16,
            device_cookie_name: "device_id".to_string(),
            device_cookie_max_age: Duration::from_secs(365 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl ActivationConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    pub fn validity_window_ms(&self) -> i64 {
        i64::try_from(self.validity_window.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn device_cookie(&self) -> CookieSpec {
        CookieSpec {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age: Some(self.device_cookie_max_age),
            ..CookieSpec::new(self.device_cookie_name.as_str())
        }
    }
}
