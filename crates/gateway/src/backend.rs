//! The dispatch seam between orchestration and the provider client.

use async_trait::async_trait;

use manaforge_core::artifact::ImagePayload;
use manaforge_core::error::GenerationError;
use manaforge_core::request::{ImageRequest, TextRequest, VideoRequest};

use crate::client::GenerationClient;
use crate::wire::{OperationHandle, OperationStatus};

/// Dispatch surface for the three generation operations and the video
/// long-running protocol.
///
/// The production implementation is [`GenerationClient`]; tests substitute
/// scripted fakes so the whole orchestration layer runs without network I/O.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_text(&self, request: &TextRequest) -> Result<String, GenerationError>;

    async fn generate_image(&self, request: &ImageRequest)
        -> Result<ImagePayload, GenerationError>;

    async fn submit_video(&self, request: &VideoRequest)
        -> Result<OperationHandle, GenerationError>;

    async fn poll_video(&self, handle: &OperationHandle)
        -> Result<OperationStatus, GenerationError>;

    async fn fetch_video_asset(&self, uri: &str) -> Result<Vec<u8>, GenerationError>;
}

#[async_trait]
impl GenerationBackend for GenerationClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String, GenerationError> {
        GenerationClient::generate_text(self, request).await
    }

    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<ImagePayload, GenerationError> {
        GenerationClient::generate_image(self, request).await
    }

    async fn submit_video(
        &self,
        request: &VideoRequest,
    ) -> Result<OperationHandle, GenerationError> {
        GenerationClient::submit_video(self, request).await
    }

    async fn poll_video(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationStatus, GenerationError> {
        GenerationClient::poll_video(self, handle).await
    }

    async fn fetch_video_asset(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        GenerationClient::fetch_video_asset(self, uri).await
    }
}
