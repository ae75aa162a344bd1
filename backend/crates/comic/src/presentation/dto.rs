//! API DTOs (Data Transfer Objects)

use crate::domain::entities::{ComicPanel, GeneratedImage};
use serde::{Deserialize, Serialize};

/// Request for POST /api/generate-script
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRequest {
    pub content: String,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub scene_number: Option<u32>,
    pub model: String,
}

/// Response for POST /api/generate-script
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResponse {
    pub comic_panels: Vec<PanelDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDto {
    pub id: String,
    pub content: String,
    pub image_url: String,
    pub scene_number: u32,
}

impl From<ComicPanel> for PanelDto {
    fn from(panel: ComicPanel) -> Self {
        Self {
            id: panel.id.to_string(),
            content: panel.content,
            image_url: panel.image_url,
            scene_number: panel.scene_number,
        }
    }
}

/// Request for POST /api/generate-images
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub script: String,
    pub style: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub image_count: Option<u8>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// Response for POST /api/generate-images
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageDto {
    pub url: String,
    pub index: usize,
}

impl From<GeneratedImage> for ImageDto {
    fn from(image: GeneratedImage) -> Self {
        Self {
            url: image.url,
            index: image.index,
        }
    }
}
