//! Generate Script Use Case

use crate::application::config::ComicConfig;
use crate::domain::entities::ComicPanel;
use crate::domain::gateway::ScriptGenerator;
use crate::domain::services::{build_script_prompt, parse_scenes};
use crate::domain::value_objects::SceneCount;
use crate::error::{ComicError, ComicResult};
use std::sync::Arc;

/// Input for generate script
#[derive(Debug, Clone)]
pub struct GenerateScriptInput {
    pub content: String,
    pub count: Option<u32>,
    /// Regenerate only this scene
    pub scene_number: Option<u32>,
    pub model: String,
}

/// Generate Script Use Case
pub struct GenerateScriptUseCase<G>
where
    G: ScriptGenerator + Sync,
{
    generator: Arc<G>,
    config: Arc<ComicConfig>,
}

impl<G> GenerateScriptUseCase<G>
where
    G: ScriptGenerator + Sync,
{
    pub fn new(generator: Arc<G>, config: Arc<ComicConfig>) -> Self {
        Self { generator, config }
    }

    pub async fn execute(&self, input: GenerateScriptInput) -> ComicResult<Vec<ComicPanel>> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(ComicError::Validation("Content must not be empty".into()));
        }
        if content.chars().count() > self.config.max_content_chars {
            return Err(ComicError::Validation(format!(
                "Content must be at most {} characters",
                self.config.max_content_chars
            )));
        }
        let model = input.model.trim();
        if model.is_empty() {
            return Err(ComicError::Validation("Model must not be empty".into()));
        }

        let count = match input.count {
            Some(n) => SceneCount::new(n).ok_or_else(|| {
                ComicError::Validation(format!(
                    "Scene count must be between {} and {}",
                    SceneCount::MIN,
                    SceneCount::MAX
                ))
            })?,
            None => SceneCount::default(),
        };
        if input.scene_number.is_some_and(|scene| !count.contains(scene)) {
            return Err(ComicError::Validation(format!(
                "Scene number must be between 1 and {}",
                count.get()
            )));
        }

        let prompt = build_script_prompt(content, count, input.scene_number);
        let answer = self.generator.complete(model, &prompt).await?;

        let panels: Vec<ComicPanel> = match input.scene_number {
            Some(scene) => parse_scenes(&answer, 1)
                .into_iter()
                .map(|text| ComicPanel::new(text, scene))
                .collect(),
            None => parse_scenes(&answer, count.get() as usize)
                .into_iter()
                .zip(1..)
                .map(|(text, n)| ComicPanel::new(text, n))
                .collect(),
        };

        if panels.is_empty() {
            return Err(ComicError::Upstream("model answer contained no scenes".into()));
        }

        tracing::info!(
            model = %model,
            requested = count.get(),
            generated = panels.len(),
            scene_number = ?input.scene_number,
            "Generated comic script"
        );

        Ok(panels)
    }
}
