//! Application Layer - Use Cases
//!
//! Each use case owns one ledger operation. [`ledger::ActivationLedger`]
//! binds them to one device and is what callers normally use.

pub mod activate_code;
pub mod check_activation;
pub mod clear_activation;
pub mod config;
pub mod ledger;
mod persisted;
pub mod refund_use;
pub mod sweep_expired;
pub mod use_once;
