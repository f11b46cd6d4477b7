//! Long-running video job poller.
//!
//! Drives a submitted operation to completion: fixed-interval status
//! polls, then an authenticated fetch of the finished asset. There is no
//! backoff and no retry inside the loop; a polling failure is fatal for
//! the job. Only the initial submission goes through the retry policy.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use manaforge_core::artifact::VideoAsset;
use manaforge_core::error::GenerationError;

use crate::backend::GenerationBackend;
use crate::wire::{OperationHandle, OperationStatus};

/// Tunable parameters for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed sleep between status checks.
    pub interval: Duration,
    /// Wall-clock fence; `None` polls until the operation reports done.
    pub max_wait: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(8),
            max_wait: Some(Duration::from_secs(600)),
        }
    }
}

/// MIME type of fetched video assets.
const VIDEO_MIME: &str = "video/mp4";

/// Poll `handle` until the operation completes, then fetch the asset bytes.
///
/// The returned asset is only ever produced from a completed operation. A
/// completed operation carrying an error payload, or one with no
/// retrievable URI, rejects instead of returning an empty result. The
/// `cancel` token is honored during the sleeps so an abandoning caller
/// does not pin the job open.
pub async fn poll_video_to_completion<B>(
    backend: &B,
    handle: &OperationHandle,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<VideoAsset, GenerationError>
where
    B: GenerationBackend + ?Sized,
{
    let started = tokio::time::Instant::now();

    loop {
        let status = backend.poll_video(handle).await?;

        if status.done {
            return finish(backend, handle, status).await;
        }

        tracing::debug!(operation = %handle.name, "Video operation still running");

        if let Some(max_wait) = config.max_wait {
            // The next useful poll would land past the fence; give up now.
            if started.elapsed() + config.interval > max_wait {
                return Err(GenerationError::TimedOut {
                    waited_secs: started.elapsed().as_secs(),
                });
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}

/// Resolve a completed operation into the fetched asset.
async fn finish<B>(
    backend: &B,
    handle: &OperationHandle,
    status: OperationStatus,
) -> Result<VideoAsset, GenerationError>
where
    B: GenerationBackend + ?Sized,
{
    if let Some(error) = status.error {
        return Err(GenerationError::Transport(format!(
            "video operation failed: {}",
            error.message
        )));
    }

    let uri = status
        .response
        .and_then(|response| response.generated_videos.into_iter().next())
        .and_then(|generated| generated.video)
        .and_then(|video| video.uri)
        .ok_or(GenerationError::EmptyResult { what: "video uri" })?;

    tracing::info!(operation = %handle.name, uri = %uri, "Video operation completed, fetching asset");

    let bytes = backend.fetch_video_asset(&uri).await?;

    Ok(VideoAsset {
        uri,
        mime_type: VIDEO_MIME.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use tokio::time::Instant;

    use manaforge_core::artifact::ImagePayload;
    use manaforge_core::request::{ImageRequest, TextRequest, VideoRequest};

    use crate::wire::{GeneratedVideo, OperationError, VideoOperationResponse, VideoRef};

    /// Backend that replays a scripted sequence of poll statuses.
    #[derive(Default)]
    struct ScriptedPolls {
        statuses: Mutex<VecDeque<OperationStatus>>,
        polls: AtomicU32,
        fetches: AtomicU32,
    }

    impl ScriptedPolls {
        fn with(statuses: Vec<OperationStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedPolls {
        async fn generate_text(&self, _: &TextRequest) -> Result<String, GenerationError> {
            unreachable!("not used by the poller")
        }

        async fn generate_image(&self, _: &ImageRequest) -> Result<ImagePayload, GenerationError> {
            unreachable!("not used by the poller")
        }

        async fn submit_video(&self, _: &VideoRequest) -> Result<OperationHandle, GenerationError> {
            unreachable!("not used by the poller")
        }

        async fn poll_video(
            &self,
            _: &OperationHandle,
        ) -> Result<OperationStatus, GenerationError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(not_done))
        }

        async fn fetch_video_asset(&self, _: &str) -> Result<Vec<u8>, GenerationError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(b"MP4!".to_vec())
        }
    }

    fn handle() -> OperationHandle {
        OperationHandle {
            name: "operations/op-123".into(),
        }
    }

    fn not_done() -> OperationStatus {
        OperationStatus {
            done: false,
            error: None,
            response: None,
        }
    }

    fn done_with_uri(uri: &str) -> OperationStatus {
        OperationStatus {
            done: true,
            error: None,
            response: Some(VideoOperationResponse {
                generated_videos: vec![GeneratedVideo {
                    video: Some(VideoRef {
                        uri: Some(uri.to_string()),
                    }),
                }],
            }),
        }
    }

    fn done_with_error(message: &str) -> OperationStatus {
        OperationStatus {
            done: true,
            error: Some(OperationError {
                message: message.to_string(),
            }),
            response: None,
        }
    }

    fn config() -> PollConfig {
        PollConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn two_intermediate_polls_then_fetches_asset() {
        let backend = ScriptedPolls::with(vec![
            not_done(),
            not_done(),
            done_with_uri("https://assets.example/video.mp4"),
        ]);
        let started = Instant::now();

        let asset =
            poll_video_to_completion(&backend, &handle(), &config(), &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(backend.polls.load(Ordering::SeqCst), 3);
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(asset.uri, "https://assets.example/video.mp4");
        assert_ne!(asset.uri, handle().name, "asset is not the raw handle");
        assert_eq!(asset.bytes, b"MP4!");
        assert_eq!(asset.mime_type, "video/mp4");
        // Two intermediate polls means exactly two fixed-interval sleeps.
        assert_eq!(Instant::now() - started, config().interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn operation_error_rejects_without_fetch() {
        let backend = ScriptedPolls::with(vec![done_with_error("safety filters rejected prompt")]);

        let result =
            poll_video_to_completion(&backend, &handle(), &config(), &CancellationToken::new())
                .await;

        assert_matches!(
            result,
            Err(GenerationError::Transport(message)) if message.contains("safety filters rejected prompt")
        );
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn done_without_uri_is_empty_result() {
        let backend = ScriptedPolls::with(vec![OperationStatus {
            done: true,
            error: None,
            response: Some(VideoOperationResponse {
                generated_videos: vec![],
            }),
        }]);

        let result =
            poll_video_to_completion(&backend, &handle(), &config(), &CancellationToken::new())
                .await;

        assert_matches!(result, Err(GenerationError::EmptyResult { what: "video uri" }));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let backend = ScriptedPolls::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = poll_video_to_completion(&backend, &handle(), &config(), &cancel).await;

        assert_matches!(result, Err(GenerationError::Cancelled));
        assert_eq!(backend.polls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wall_clock_fence_raises_timed_out() {
        let backend = ScriptedPolls::default();
        let config = PollConfig {
            interval: Duration::from_secs(8),
            max_wait: Some(Duration::from_secs(20)),
        };

        let result =
            poll_video_to_completion(&backend, &handle(), &config, &CancellationToken::new()).await;

        assert_matches!(result, Err(GenerationError::TimedOut { .. }));
        assert_eq!(backend.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn no_fence_polls_until_done() {
        let mut statuses = vec![not_done(); 100];
        statuses.push(done_with_uri("https://assets.example/long.mp4"));
        let backend = ScriptedPolls::with(statuses);
        let config = PollConfig {
            interval: Duration::from_secs(8),
            max_wait: None,
        };

        let asset =
            poll_video_to_completion(&backend, &handle(), &config, &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(backend.polls.load(Ordering::SeqCst), 101);
        assert_eq!(asset.uri, "https://assets.example/long.mp4");
    }
}
