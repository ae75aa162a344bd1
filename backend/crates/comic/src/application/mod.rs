//! Application Layer - Use Cases

pub mod config;
pub mod generate_images;
pub mod generate_script;
