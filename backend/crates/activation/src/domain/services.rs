//! Domain Services
//!
//! Pure logic over the persisted activation state: storage keys, checksum
//! computation and the three-part validity check.

use crate::domain::entities::UsageRecord;
use crate::domain::value_objects::DeviceFingerprint;
use platform::crypto::{constant_time_eq, obfuscate, reveal, sha256_base64};
use std::fmt;
use std::sync::LazyLock;

/// Plain key names; the store only ever sees their obfuscated form.
pub mod keys {
    pub const USAGE_RECORD: &str = "activated_code_usage";
    pub const DEVICE_IDENTIFIER: &str = "device_identifier";
    pub const ACTIVATION_TIMESTAMP: &str = "activation_timestamp";
    pub const USAGE_CHECKSUM: &str = "usage_checksum";
}

/// Obfuscated storage keys
#[derive(Debug)]
pub struct StorageKeys {
    pub record: String,
    pub fingerprint: String,
    pub timestamp: String,
    pub checksum: String,
}

impl StorageKeys {
    pub fn get() -> &'static StorageKeys {
        static KEYS: LazyLock<StorageKeys> = LazyLock::new(|| StorageKeys {
            record: obfuscate(keys::USAGE_RECORD),
            fingerprint: obfuscate(keys::DEVICE_IDENTIFIER),
            timestamp: obfuscate(keys::ACTIVATION_TIMESTAMP),
            checksum: obfuscate(keys::USAGE_CHECKSUM),
        });
        &KEYS
    }

    /// All four keys, in snapshot order
    pub fn all(&self) -> [&str; 4] {
        [
            self.record.as_str(),
            self.fingerprint.as_str(),
            self.timestamp.as_str(),
            self.checksum.as_str(),
        ]
    }
}

/// Raw (still obfuscated) values of the four keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub record: Option<String>,
    pub fingerprint: Option<String>,
    pub timestamp: Option<String>,
    pub checksum: Option<String>,
}

impl PersistedState {
    /// Build from a snapshot taken with [`StorageKeys::all`]
    pub fn from_snapshot(values: Vec<Option<String>>) -> Self {
        let mut values = values.into_iter();
        Self {
            record: values.next().flatten(),
            fingerprint: values.next().flatten(),
            timestamp: values.next().flatten(),
            checksum: values.next().flatten(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
            && self.fingerprint.is_none()
            && self.timestamp.is_none()
            && self.checksum.is_none()
    }
}

/// Why a persisted activation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    MissingRecord,
    CorruptRecord,
    FingerprintMismatch,
    Expired,
    ChecksumMismatch,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidReason::MissingRecord => "missing usage record",
            InvalidReason::CorruptRecord => "corrupt usage record",
            InvalidReason::FingerprintMismatch => "device fingerprint mismatch",
            InvalidReason::Expired => "activation window elapsed",
            InvalidReason::ChecksumMismatch => "checksum mismatch",
        };
        f.write_str(s)
    }
}

/// A record that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidState {
    pub record: UsageRecord,
    /// Stored checksum exactly as persisted (obfuscated); the CAS guard
    pub raw_checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Nothing persisted
    Absent,
    Invalid(InvalidReason),
    Valid(ValidState),
}

/// Parameters for [`evaluate`]
#[derive(Debug, Clone, Copy)]
pub struct ValidityCheck<'a> {
    pub fingerprint: &'a DeviceFingerprint,
    pub now_ms: i64,
    pub window_ms: i64,
    pub checksum_salt: &'a str,
}

/// Checksum over the serialized record plus the embedded salt
pub fn compute_checksum(record_json: &str, salt: &str) -> String {
    sha256_base64(&[record_json.as_bytes(), salt.as_bytes()])
}

/// `activated_ms` lies in `[now - window, now]`; any overflow counts as outside
pub fn within_window(now_ms: i64, activated_ms: i64, window_ms: i64) -> bool {
    now_ms
        .checked_sub(activated_ms)
        .is_some_and(|elapsed| (0..=window_ms).contains(&elapsed))
}

/// Run the fingerprint, window and checksum checks
pub fn evaluate(state: &PersistedState, check: ValidityCheck<'_>) -> Validity {
    if state.is_empty() {
        return Validity::Absent;
    }

    let Some(raw_record) = state.record.as_deref() else {
        return Validity::Invalid(InvalidReason::MissingRecord);
    };
    let Ok(record_json) = reveal(raw_record) else {
        return Validity::Invalid(InvalidReason::CorruptRecord);
    };
    let record: UsageRecord = match serde_json::from_str(&record_json) {
        Ok(record) => record,
        Err(_) => return Validity::Invalid(InvalidReason::CorruptRecord),
    };
    if !record.is_consistent() {
        return Validity::Invalid(InvalidReason::CorruptRecord);
    }

    let fingerprint_matches = state
        .fingerprint
        .as_deref()
        .and_then(|raw| reveal(raw).ok())
        .is_some_and(|stored| stored == check.fingerprint.as_str());
    if !fingerprint_matches {
        return Validity::Invalid(InvalidReason::FingerprintMismatch);
    }

    let activated_ms = state
        .timestamp
        .as_deref()
        .and_then(|raw| reveal(raw).ok())
        .and_then(|plain| plain.trim().parse::<i64>().ok());
    if !activated_ms.is_some_and(|ts| within_window(check.now_ms, ts, check.window_ms)) {
        return Validity::Invalid(InvalidReason::Expired);
    }

    let Some(raw_checksum) = state.checksum.as_deref() else {
        return Validity::Invalid(InvalidReason::ChecksumMismatch);
    };
    let expected = compute_checksum(&record_json, check.checksum_salt);
    let checksum_matches = reveal(raw_checksum)
        .is_ok_and(|stored| constant_time_eq(stored.as_bytes(), expected.as_bytes()));
    if !checksum_matches {
        return Validity::Invalid(InvalidReason::ChecksumMismatch);
    }

    Validity::Valid(ValidState {
        record,
        raw_checksum: raw_checksum.to_string(),
    })
}

/// Obfuscated `(key, value)` writes for a record and its checksum
pub fn record_writes(
    record: &UsageRecord,
    salt: &str,
) -> Result<[(&'static str, String); 2], serde_json::Error> {
    let keys = StorageKeys::get();
    let json = serde_json::to_string(record)?;
    let checksum = compute_checksum(&json, salt);
    Ok([
        (keys.record.as_str(), obfuscate(&json)),
        (keys.checksum.as_str(), obfuscate(&checksum)),
    ])
}
