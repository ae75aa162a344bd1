//! Domain Entities

use kernel::id::PanelId;

/// One scene of a generated comic script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicPanel {
    pub id: PanelId,
    pub content: String,
    /// Filled in by the client once the panel has been rendered
    pub image_url: String,
    /// 1-based
    pub scene_number: u32,
}

impl ComicPanel {
    pub fn new(content: impl Into<String>, scene_number: u32) -> Self {
        Self {
            id: PanelId::new(),
            content: content.into(),
            image_url: String::new(),
            scene_number,
        }
    }
}

/// A rendered image returned by the image API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub index: usize,
}
