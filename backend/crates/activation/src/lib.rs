//! Activation Ledger Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Code table, usage record, validity checks, store trait
//! - `application/` - Use cases, the per-device [`ActivationLedger`] and the
//!   expiry sweep
//! - `infra/` - Memory, JSON-file and device-scoped stores
//! - `presentation/` - HTTP handlers and gating middleware
//!
//! ## Trust Model
//! - The code table ships inside the binary; codes are readable by anyone
//!   holding it
//! - Persisted values are obfuscated, not encrypted
//! - The checksum and fingerprint detect casual edits and copied state, not
//!   a determined attacker

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::ActivationConfig;
pub use application::ledger::ActivationLedger;
pub use application::sweep_expired::SweepExpiredUseCase;
pub use domain::code_table::{CodeEntry, CodeTable};
pub use domain::entities::{ActivationOutcome, CodeInfo, UsageRecord};
pub use domain::repository::{KeyValueStore, StoreError, StoreResult};
pub use error::{ActivationError, ActivationResult};
pub use infra::{json_file::JsonFileStore, memory::MemoryStore, scoped::DeviceScopedStore};
pub use presentation::handlers::ActivationAppState;
pub use presentation::middleware::{consume_activation, require_activation};
pub use presentation::router::activation_router;

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
