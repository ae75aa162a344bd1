//! Domain Value Objects
//!
//! Validated request parameters for script and image generation.

use std::fmt;
use std::str::FromStr;

/// Number of scenes in a generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCount(u32);

impl SceneCount {
    pub const DEFAULT: SceneCount = SceneCount(4);
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 12;

    pub fn new(count: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Some(Self(count))
        } else {
            None
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Whether `scene` is a valid 1-based scene number for this count
    pub fn contains(&self, scene: u32) -> bool {
        (1..=self.0).contains(&scene)
    }
}

impl Default for SceneCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of images to render for one script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCount(u8);

impl ImageCount {
    pub const DEFAULT: ImageCount = ImageCount(1);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(count: u8) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Some(Self(count))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for ImageCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Art style preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtStyle {
    Manga,
    American,
    Watercolor,
    Pixel,
    Realistic,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 5] = [
        ArtStyle::Manga,
        ArtStyle::American,
        ArtStyle::Watercolor,
        ArtStyle::Pixel,
        ArtStyle::Realistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtStyle::Manga => "manga",
            ArtStyle::American => "american",
            ArtStyle::Watercolor => "watercolor",
            ArtStyle::Pixel => "pixel",
            ArtStyle::Realistic => "realistic",
        }
    }

    /// Phrase prepended to the image prompt
    pub fn preset(&self) -> &'static str {
        match self {
            ArtStyle::Manga => {
                "Japanese manga panel, black and white ink, screentone shading, dynamic angles"
            }
            ArtStyle::American => {
                "American comic book panel, bold outlines, flat vivid colors, halftone dots"
            }
            ArtStyle::Watercolor => {
                "Watercolor comic illustration, soft washes, visible paper texture, gentle palette"
            }
            ArtStyle::Pixel => "Pixel art comic panel, 16-bit palette, crisp pixels, retro game look",
            ArtStyle::Realistic => {
                "Realistic graphic novel panel, detailed lighting, cinematic composition"
            }
        }
    }
}

impl FromStr for ArtStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ArtStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or(())
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
    Wide,
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }

    /// Pixel size requested from the image API
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Landscape => (1152, 864),
            AspectRatio::Portrait => (864, 1152),
            AspectRatio::Wide => (1344, 768),
            AspectRatio::Tall => (768, 1344),
        }
    }

    /// `WIDTHxHEIGHT`
    pub fn size(&self) -> String {
        let (w, h) = self.dimensions();
        format!("{w}x{h}")
    }
}

impl FromStr for AspectRatio {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(AspectRatio::Square),
            "4:3" => Ok(AspectRatio::Landscape),
            "3:4" => Ok(AspectRatio::Portrait),
            "16:9" => Ok(AspectRatio::Wide),
            "9:16" => Ok(AspectRatio::Tall),
            _ => Err(()),
        }
    }
}
