//! Generator Traits
//!
//! Interfaces to the upstream generation APIs. Implementation is in the
//! infrastructure layer.

use crate::domain::services::ScriptPrompt;
use crate::error::ComicResult;

/// Image rendering job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub prompt: String,
    /// `WIDTHxHEIGHT`
    pub size: String,
    pub count: u8,
}

/// Text completion for comic scripts
#[trait_variant::make(ScriptGenerator: Send)]
pub trait LocalScriptGenerator {
    /// Raw model answer for the prompt
    async fn complete(&self, model: &str, prompt: &ScriptPrompt) -> ComicResult<String>;
}

/// Image rendering
#[trait_variant::make(ImageGenerator: Send)]
pub trait LocalImageGenerator {
    /// Image URLs (or data URLs), in order
    async fn render(&self, job: &ImageJob) -> ComicResult<Vec<String>>;
}
