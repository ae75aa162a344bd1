//! Infrastructure Layer - Upstream API clients

pub mod openai;
