//! Infrastructure Layer - Store implementations

pub mod json_file;
pub mod memory;
pub mod scoped;
