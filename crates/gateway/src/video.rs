//! Video generation: the submission half of the long-running protocol.
//!
//! Submission returns an opaque [`OperationHandle`]; driving the job to a
//! fetched asset is [`crate::poller`]'s job.

use manaforge_core::error::GenerationError;
use manaforge_core::request::VideoRequest;

use crate::client::GenerationClient;
use crate::wire::{
    InlineData, OperationHandle, OperationStatus, VideoInstance, VideoParameters,
    VideoSubmitRequest,
};

/// Videos are generated one at a time.
const SAMPLE_COUNT: u32 = 1;

/// Build the long-running submission body for a video generation.
pub fn build_video_request(request: &VideoRequest) -> VideoSubmitRequest {
    VideoSubmitRequest {
        instances: vec![VideoInstance {
            prompt: request.prompt.clone(),
            image: request.reference_image.as_ref().map(|reference| InlineData {
                mime_type: reference.mime_type.clone(),
                data: reference.data.clone(),
            }),
        }],
        parameters: VideoParameters {
            sample_count: SAMPLE_COUNT,
            resolution: request.resolution.as_str().to_string(),
            aspect_ratio: request.aspect_ratio.as_str().to_string(),
        },
    }
}

impl GenerationClient {
    /// Submit a video generation job, returning its operation handle.
    ///
    /// A non-video model in the request falls back to the fast video model
    /// rather than failing the submission.
    pub async fn submit_video(
        &self,
        request: &VideoRequest,
    ) -> Result<OperationHandle, GenerationError> {
        request.validate()?;
        let model = request.model.video_or_fallback();
        let body = build_video_request(request);
        self.post_model(model.as_str(), "predictLongRunning", &body)
            .await
    }

    /// Query the status of a submitted operation.
    pub async fn poll_video(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationStatus, GenerationError> {
        self.get_named(&handle.name).await
    }

    /// Download the finished video bytes from the provider URI.
    pub async fn fetch_video_asset(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        self.get_bytes(uri).await
    }
}
