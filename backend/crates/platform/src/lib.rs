//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hashing and encoding utilities (SHA-256, Base64, reversible obfuscation)
//! - Device trait extraction from request headers
//! - Cookie management

pub mod client;
pub mod cookie;
pub mod crypto;
