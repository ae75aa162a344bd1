//! Generate Images Use Case

use crate::application::config::ComicConfig;
use crate::domain::entities::GeneratedImage;
use crate::domain::gateway::{ImageGenerator, ImageJob};
use crate::domain::services::build_image_prompt;
use crate::domain::value_objects::{ArtStyle, AspectRatio, ImageCount};
use crate::error::{ComicError, ComicResult};
use std::sync::Arc;

/// Input for generate images
#[derive(Debug, Clone)]
pub struct GenerateImagesInput {
    pub script: String,
    pub style: String,
    pub aspect_ratio: Option<String>,
    pub image_count: Option<u8>,
    pub negative_prompt: Option<String>,
}

/// Generate Images Use Case
pub struct GenerateImagesUseCase<G>
where
    G: ImageGenerator + Sync,
{
    generator: Arc<G>,
    config: Arc<ComicConfig>,
}

impl<G> GenerateImagesUseCase<G>
where
    G: ImageGenerator + Sync,
{
    pub fn new(generator: Arc<G>, config: Arc<ComicConfig>) -> Self {
        Self { generator, config }
    }

    pub async fn execute(&self, input: GenerateImagesInput) -> ComicResult<Vec<GeneratedImage>> {
        let script = input.script.trim();
        if script.is_empty() {
            return Err(ComicError::Validation("Script must not be empty".into()));
        }
        if script.chars().count() > self.config.max_script_chars {
            return Err(ComicError::Validation(format!(
                "Script must be at most {} characters",
                self.config.max_script_chars
            )));
        }

        let style: ArtStyle = input
            .style
            .parse()
            .map_err(|_| ComicError::UnknownStyle(input.style.clone()))?;

        let aspect_ratio = match input.aspect_ratio.as_deref() {
            Some(raw) => raw.parse::<AspectRatio>().map_err(|_| {
                ComicError::Validation(format!("Unsupported aspect ratio: {raw}"))
            })?,
            None => AspectRatio::default(),
        };

        let count = match input.image_count {
            Some(n) => ImageCount::new(n).ok_or_else(|| {
                ComicError::Validation(format!(
                    "Image count must be between {} and {}",
                    ImageCount::MIN,
                    ImageCount::MAX
                ))
            })?,
            None => ImageCount::default(),
        };

        let job = ImageJob {
            prompt: build_image_prompt(script, style, input.negative_prompt.as_deref()),
            size: aspect_ratio.size(),
            count: count.get(),
        };

        let urls = self.generator.render(&job).await?;
        if urls.is_empty() {
            return Err(ComicError::Upstream("image API returned no images".into()));
        }

        tracing::info!(
            style = %style,
            size = %job.size,
            requested = count.get(),
            generated = urls.len(),
            "Generated panel images"
        );

        Ok(urls
            .into_iter()
            .take(count.get() as usize)
            .enumerate()
            .map(|(index, url)| GeneratedImage { url, index })
            .collect())
    }
}
