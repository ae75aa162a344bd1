//! Comic Generation Backend Module
//!
//! Thin proxies in front of OpenAI-compatible APIs:
//! - script generation turns article text into numbered comic scenes
//! - image generation renders one scene in a chosen art style
//!
//! Clean Architecture structure:
//! - `domain/` - Panels, prompt building, generator traits
//! - `application/` - Use cases
//! - `infra/` - reqwest client for the upstream APIs
//! - `presentation/` - HTTP handlers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::ComicConfig;
pub use domain::gateway::{ImageGenerator, ImageJob, ScriptGenerator};
pub use domain::services::ScriptPrompt;
pub use error::{ComicError, ComicResult};
pub use infra::openai::OpenAiClient;
pub use presentation::handlers::ComicAppState;
pub use presentation::router::{comic_router, image_router, script_router};

#[cfg(test)]
mod tests;
