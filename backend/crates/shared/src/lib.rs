//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every backend crate agrees on:
//! - The boundary error type and its HTTP rendering
//! - Typed ID wrappers (device ids, panel ids)
//! - The clock abstraction used for every time-boxed check

pub mod clock;
pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
