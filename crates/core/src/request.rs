//! Typed generation requests, one per artifact kind.
//!
//! Each operation gets its own request struct with explicit option fields
//! instead of a free-form option bag; requests are validated at the
//! gateway boundary before any network dispatch.

use crate::artifact::ImagePayload;
use crate::error::GenerationError;
use crate::model::{ArtifactKind, ModelId};

/// Largest image batch a single request may fan out into.
pub const MAX_IMAGE_BATCH: u32 = 4;

// ---------------------------------------------------------------------------
// Shared option enums
// ---------------------------------------------------------------------------

/// Supported aspect ratios across image and video operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    ThreeFour,
    FourThree,
    NineSixteen,
    SixteenNine,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::ThreeFour => "3:4",
            Self::FourThree => "4:3",
            Self::NineSixteen => "9:16",
            Self::SixteenNine => "16:9",
        }
    }
}

/// Output size tier for image generation (pro image model only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    K1,
    K2,
    K4,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::K1 => "1K",
            Self::K2 => "2K",
            Self::K4 => "4K",
        }
    }
}

/// Output resolution tier for video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    P720,
    P1080,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

/// Fixed copywriting styles for the three-variant copy suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStyle {
    Professional,
    Creative,
    Concise,
}

impl CopyStyle {
    pub const ALL: [CopyStyle; 3] = [Self::Professional, Self::Creative, Self::Concise];

    /// System instruction steering the model toward this style.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Professional => {
                "You are a senior brand marketing officer. Write formal, professional, \
                 rigorously structured commercial copy that emphasizes brand strength and \
                 product reliability. Output only the copy itself, with no analysis, \
                 preamble, or suggestions."
            }
            Self::Creative => {
                "You are a top advertising creative director. Write imaginative, \
                 emotionally resonant copy with strong visual imagery that moves the \
                 audience. Output only the copy itself, with no explanatory text."
            }
            Self::Concise => {
                "You are a viral short-video and social media copywriter. Write punchy, \
                 benefit-first copy with a strong call to action, suited to fast reading. \
                 Output only the copy body."
            }
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Creative => "Creative",
            Self::Concise => "Concise",
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One commercial-copy generation.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub prompt: String,
    pub model: ModelId,
    /// Overrides the default copywriting persona when set.
    pub system_instruction: Option<String>,
}

impl TextRequest {
    /// Validate the request before dispatch.
    pub fn validate(&self) -> Result<(), GenerationError> {
        validate_prompt(&self.prompt)?;
        if self.model.kind() != ArtifactKind::Text {
            return Err(GenerationError::InvalidRequest(format!(
                "{} is not a text model",
                self.model.as_str()
            )));
        }
        Ok(())
    }
}

/// One image generation, optionally fanned out as a batch.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: ModelId,
    pub aspect_ratio: AspectRatio,
    /// Only honored by models where [`ModelId::supports_image_size`] holds.
    pub image_size: Option<ImageSize>,
    /// Inline reference image whose subject must be preserved.
    pub reference_image: Option<ImagePayload>,
    /// Number of independent outputs; billed as one unit up front.
    pub batch_size: u32,
}

impl ImageRequest {
    /// Validate the request before cost estimation and dispatch.
    pub fn validate(&self) -> Result<(), GenerationError> {
        validate_prompt(&self.prompt)?;
        if self.model.kind() != ArtifactKind::Image {
            return Err(GenerationError::InvalidRequest(format!(
                "{} is not an image model",
                self.model.as_str()
            )));
        }
        if self.batch_size == 0 || self.batch_size > MAX_IMAGE_BATCH {
            return Err(GenerationError::InvalidRequest(format!(
                "batch size must be between 1 and {MAX_IMAGE_BATCH}"
            )));
        }
        Ok(())
    }
}

/// One video generation (always a long-running job, never a single round trip).
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    /// Coerced via [`ModelId::video_or_fallback`] at submission.
    pub model: ModelId,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    /// Inline seed image for image-to-video generation.
    pub reference_image: Option<ImagePayload>,
}

impl VideoRequest {
    /// Validate the request before dispatch.
    pub fn validate(&self) -> Result<(), GenerationError> {
        validate_prompt(&self.prompt)
    }
}

fn validate_prompt(prompt: &str) -> Result<(), GenerationError> {
    if prompt.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}
