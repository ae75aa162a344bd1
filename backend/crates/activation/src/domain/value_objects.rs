//! Domain Value Objects

use platform::client::DeviceTraits;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// A user-supplied activation code in canonical form.
///
/// Canonical form is NFKC, trimmed, uppercase. Full-width input such as
/// `ｄｅｍｏ-２０２４-ｆｒｅｅ` therefore matches `DEMO-2024-FREE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Normalise raw input. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw.nfkc().collect();
        let canonical = normalized.trim().to_uppercase();
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used as table key and inside the persisted record
    pub fn obfuscated(&self) -> String {
        platform::crypto::obfuscate(&self.0)
    }
}

impl fmt::Display for ActivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weak same-device check value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFingerprint(String);

impl DeviceFingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_traits(traits: &DeviceTraits) -> Self {
        Self(traits.fingerprint())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_trimmed_and_uppercased() {
        let code = ActivationCode::parse("  demo-2024-free \n").unwrap();
        assert_eq!(code.as_str(), "DEMO-2024-FREE");
    }

    #[test]
    fn test_code_full_width_is_folded() {
        let code = ActivationCode::parse("ｄｅｍｏ－２０２４－ｆｒｅｅ").unwrap();
        assert_eq!(code.as_str(), "DEMO-2024-FREE");
    }

    #[test]
    fn test_blank_code_is_rejected() {
        assert!(ActivationCode::parse("").is_none());
        assert!(ActivationCode::parse("   \t").is_none());
    }

    #[test]
    fn test_obfuscated_code_reveals_to_canonical() {
        let code = ActivationCode::parse("abc").unwrap();
        assert_eq!(platform::crypto::reveal(&code.obfuscated()).unwrap(), "ABC");
    }

    #[test]
    fn test_fingerprint_from_traits() {
        let traits = DeviceTraits::new("ua").with_screen(800, 600);
        assert_eq!(DeviceFingerprint::from_traits(&traits).as_str(), "ua|800x600||");
    }
}
