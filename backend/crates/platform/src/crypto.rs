//! Hashing and Encoding Utilities
//!
//! `obfuscate`/`reveal` are a reversible transform (base64 then reverse).
//! They keep casual readers of persisted values out, nothing more.

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Error returned when an obfuscated value cannot be revealed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevealError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("revealed bytes are not UTF-8")]
    Utf8,
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 over several parts, base64 encoded
pub fn sha256_base64(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    to_base64(&digest)
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Obfuscate a UTF-8 string: base64 of its bytes, reversed.
pub fn obfuscate(plain: &str) -> String {
    to_base64(plain.as_bytes()).chars().rev().collect()
}

/// Inverse of [`obfuscate`]
pub fn reveal(obfuscated: &str) -> Result<String, RevealError> {
    let encoded: String = obfuscated.chars().rev().collect();
    let bytes = from_base64(&encoded)?;
    String::from_utf8(bytes).map_err(|_| RevealError::Utf8)
}

/// Constant-time comparison
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
