//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - The redeemable code table
//! - Value objects (normalised activation code, device fingerprint)
//! - The persisted usage record
//! - Validity evaluation and checksum services
//! - The key-value store trait (interface)

pub mod code_table;
pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
