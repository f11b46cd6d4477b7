//! Artifacts produced by successful generation calls.

use crate::error::GenerationError;
use crate::request::CopyStyle;

/// A base64-encoded raster image, embeddable as a `data:` URI.
///
/// Used both as generation output and as the inline reference image
/// attached to image and video requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

impl ImagePayload {
    /// Render as a `data:` URI for embedding.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, GenerationError> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| {
            GenerationError::InvalidRequest("image must be a data: URI".to_string())
        })?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            GenerationError::InvalidRequest("image data: URI must be base64-encoded".to_string())
        })?;
        if mime_type.is_empty() || data.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "image data: URI is missing its MIME type or payload".to_string(),
            ));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// A fetched video asset.
///
/// Produced only after the long-running operation completes and the binary
/// content has been downloaded; holding the bytes makes the asset locally
/// addressable independent of the provider URI's lifetime.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    /// Provider URI the bytes were fetched from.
    pub uri: String,
    /// MIME type of the content, e.g. `video/mp4`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One styled variant out of a copy suite.
#[derive(Debug, Clone)]
pub struct StyledCopy {
    pub style: CopyStyle,
    pub content: String,
}
