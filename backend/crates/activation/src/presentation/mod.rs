//! Presentation Layer
//!
//! HTTP handlers, DTOs and gating middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
