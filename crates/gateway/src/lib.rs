//! Client for the hosted generative-model API.
//!
//! [`GenerationClient`] speaks the provider's wire protocols: chat-style
//! completions for text, `generateContent` for images, and the
//! long-running-operation protocol for video. [`call_with_retry`] wraps
//! dispatch with rate-limit backoff, and [`poll_video_to_completion`]
//! drives a submitted video job through to its fetched asset.
//!
//! The [`GenerationBackend`] trait is the seam between orchestration and
//! this client; tests substitute scripted implementations.

pub mod backend;
pub mod client;
pub mod image;
pub mod poller;
pub mod retry;
pub mod text;
pub mod video;
pub mod wire;

pub use backend::GenerationBackend;
pub use client::{GatewayConfig, GenerationClient};
pub use poller::{poll_video_to_completion, PollConfig};
pub use retry::{call_with_retry, RetryPolicy};
