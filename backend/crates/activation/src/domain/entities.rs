//! Domain Entities

use crate::domain::value_objects::ActivationCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-device usage record.
///
/// Invariant: `used_count <= total_uses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Obfuscated canonical code
    pub code: String,
    pub total_uses: u32,
    pub used_count: u32,
    /// RFC 3339
    pub activated_at: String,
}

impl UsageRecord {
    pub fn new(code: &ActivationCode, total_uses: u32, activated_at: DateTime<Utc>) -> Self {
        Self {
            code: code.obfuscated(),
            total_uses,
            used_count: 0,
            activated_at: activated_at.to_rfc3339(),
        }
    }

    pub fn remaining_uses(&self) -> u32 {
        self.total_uses.saturating_sub(self.used_count)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used_count >= self.total_uses
    }

    pub fn is_consistent(&self) -> bool {
        self.used_count <= self.total_uses
    }

    /// The record after one more use, or `None` at exhaustion
    pub fn consumed(&self) -> Option<Self> {
        if self.is_exhausted() {
            return None;
        }
        Some(Self {
            used_count: self.used_count + 1,
            ..self.clone()
        })
    }

    /// The record with one use given back, or `None` when nothing was used
    pub fn refunded(&self) -> Option<Self> {
        let used_count = self.used_count.checked_sub(1)?;
        Some(Self {
            used_count,
            ..self.clone()
        })
    }

    /// Canonical plain-text code
    pub fn plain_code(&self) -> Option<String> {
        platform::crypto::reveal(&self.code).ok()
    }
}

/// Code and remaining uses of the current activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInfo {
    pub code: String,
    pub remaining_uses: u32,
}

/// Result of an activation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationOutcome {
    pub success: bool,
    pub message: String,
    pub remaining_uses: u32,
}

impl ActivationOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            remaining_uses: 0,
        }
    }

    pub fn activated(message: impl Into<String>, remaining_uses: u32) -> Self {
        Self {
            success: true,
            message: message.into(),
            remaining_uses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(total: u32, used: u32) -> UsageRecord {
        let code = ActivationCode::parse("DEMO-2024-FREE").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        UsageRecord {
            used_count: used,
            ..UsageRecord::new(&code, total, at)
        }
    }

    #[test]
    fn test_new_record_starts_unused() {
        let r = record(5, 0);
        assert_eq!(r.remaining_uses(), 5);
        assert!(!r.is_exhausted());
        assert_eq!(r.plain_code().as_deref(), Some("DEMO-2024-FREE"));
    }

    #[test]
    fn test_consumed_until_exhausted() {
        let r = record(2, 0).consumed().unwrap().consumed().unwrap();
        assert_eq!(r.used_count, 2);
        assert!(r.is_exhausted());
        assert!(r.consumed().is_none());
    }

    #[test]
    fn test_refunded_stops_at_zero() {
        let r = record(3, 1).refunded().unwrap();
        assert_eq!(r.used_count, 0);
        assert_eq!(r.remaining_uses(), 3);
        assert!(r.refunded().is_none());
    }

    #[test]
    fn test_remaining_never_underflows() {
        let r = record(1, 3);
        assert_eq!(r.remaining_uses(), 0);
        assert!(!r.is_consistent());
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let json = serde_json::to_string(&record(5, 1)).unwrap();
        assert!(json.contains("\"totalUses\":5"));
        assert!(json.contains("\"usedCount\":1"));
        assert!(json.contains("\"activatedAt\""));
    }
}
