//! HTTP Handlers

use crate::application::config::ComicConfig;
use crate::application::generate_images::{GenerateImagesInput, GenerateImagesUseCase};
use crate::application::generate_script::{GenerateScriptInput, GenerateScriptUseCase};
use crate::domain::gateway::{ImageGenerator, ScriptGenerator};
use crate::error::{ComicError, ComicResult};
use crate::presentation::dto::{ImageRequest, ImageResponse, ScriptRequest, ScriptResponse};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

/// Shared state for comic handlers
pub struct ComicAppState<G>
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    pub generator: Arc<G>,
    pub config: Arc<ComicConfig>,
}

impl<G> Clone for ComicAppState<G>
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<G> ComicAppState<G>
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    pub fn new(generator: G, config: ComicConfig) -> Self {
        Self {
            generator: Arc::new(generator),
            config: Arc::new(config),
        }
    }
}

/// Malformed JSON answers with the same `{error}` body as validation
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ComicResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ComicError::Validation(rejection.body_text()))
}

/// POST /api/generate-script
pub async fn generate_script<G>(
    State(state): State<ComicAppState<G>>,
    payload: Result<Json<ScriptRequest>, JsonRejection>,
) -> ComicResult<Json<ScriptResponse>>
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    let req = body(payload)?;

    let use_case = GenerateScriptUseCase::new(state.generator.clone(), state.config.clone());
    let panels = use_case
        .execute(GenerateScriptInput {
            content: req.content,
            count: req.count,
            scene_number: req.scene_number,
            model: req.model,
        })
        .await?;

    Ok(Json(ScriptResponse {
        comic_panels: panels.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/generate-images
pub async fn generate_images<G>(
    State(state): State<ComicAppState<G>>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> ComicResult<Json<ImageResponse>>
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    let req = body(payload)?;

    let use_case = GenerateImagesUseCase::new(state.generator.clone(), state.config.clone());
    let images = use_case
        .execute(GenerateImagesInput {
            script: req.script,
            style: req.style,
            aspect_ratio: req.aspect_ratio,
            image_count: req.image_count,
            negative_prompt: req.negative_prompt,
        })
        .await?;

    Ok(Json(ImageResponse {
        success: true,
        images: images.into_iter().map(Into::into).collect(),
    }))
}
