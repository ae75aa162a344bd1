//! Application Configuration
//!
//! Upstream endpoints and request limits for comic generation.

use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Comic generation configuration
#[derive(Debug, Clone)]
pub struct ComicConfig {
    /// Base URL of the OpenAI-compatible chat API
    pub script_api_url: String,
    pub script_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible image API
    pub image_api_url: String,
    pub image_api_key: Option<String>,
    pub image_model: String,
    /// Timeout for one upstream request
    pub upstream_timeout: Duration,
    /// Longest accepted article, in characters
    pub max_content_chars: usize,
    /// Longest accepted scene script, in characters
    pub max_script_chars: usize,
}

impl Default for ComicConfig {
    fn default() -> Self {
        Self {
            script_api_url: OPENAI_API_BASE.to_string(),
            script_api_key: None,
            image_api_url: OPENAI_API_BASE.to_string(),
            image_api_key: None,
            image_model: "dall-e-3".to_string(),
            upstream_timeout: Duration::from_secs(60),
            max_content_chars: 20_000,
            max_script_chars: 4_000,
        }
    }
}

impl ComicConfig {
    /// Create config for development (local OpenAI-compatible server)
    pub fn development() -> Self {
        Self {
            script_api_url: "http://localhost:11434/v1".to_string(),
            image_api_url: "http://localhost:11434/v1".to_string(),
            upstream_timeout: Duration::from_secs(300),
            ..Self::default()
        }
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.script_api_url.trim_end_matches('/'))
    }

    pub fn image_generations_url(&self) -> String {
        format!("{}/images/generations", self.image_api_url.trim_end_matches('/'))
    }
}
