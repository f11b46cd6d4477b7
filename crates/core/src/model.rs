//! The provider model catalog and option-coupling rules.
//!
//! Each model knows what kind of artifact it produces and which optional
//! capabilities it honors. Request builders consult these predicates so an
//! unsupported option is omitted from the wire payload entirely rather
//! than silently applied to an incompatible model.

use serde::{Deserialize, Serialize};

/// What kind of artifact a generation operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Text,
    Image,
    Video,
}

/// Quality tier of a model within its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Flash,
    Pro,
}

/// The hosted models the gateway can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    TextFlash,
    TextPro,
    ImageFlash,
    ImagePro,
    VideoFast,
    VideoHd,
}

impl ModelId {
    /// Wire identifier sent to the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextFlash => "gemini-3-flash-preview",
            Self::TextPro => "gemini-3-pro-preview",
            Self::ImageFlash => "gemini-2.5-flash-image",
            Self::ImagePro => "gemini-3-pro-image-preview",
            Self::VideoFast => "veo-3.1-fast-generate-preview",
            Self::VideoHd => "veo-3.1-generate-preview",
        }
    }

    /// The artifact kind this model produces.
    pub fn kind(self) -> ArtifactKind {
        match self {
            Self::TextFlash | Self::TextPro => ArtifactKind::Text,
            Self::ImageFlash | Self::ImagePro => ArtifactKind::Image,
            Self::VideoFast | Self::VideoHd => ArtifactKind::Video,
        }
    }

    /// Quality tier within the model's kind.
    pub fn tier(self) -> ModelTier {
        match self {
            Self::TextFlash | Self::ImageFlash | Self::VideoFast => ModelTier::Flash,
            Self::TextPro | Self::ImagePro | Self::VideoHd => ModelTier::Pro,
        }
    }

    /// The image-size tier is honored only by the pro image model.
    pub fn supports_image_size(self) -> bool {
        matches!(self, Self::ImagePro)
    }

    /// Web grounding is available only on the pro image model.
    pub fn supports_grounding(self) -> bool {
        matches!(self, Self::ImagePro)
    }

    /// Coerce to a video-capable model.
    ///
    /// A non-video model selected for a video request falls back to the
    /// fast video tier instead of failing the request.
    pub fn video_or_fallback(self) -> ModelId {
        match self.kind() {
            ArtifactKind::Video => self,
            _ => Self::VideoFast,
        }
    }
}
