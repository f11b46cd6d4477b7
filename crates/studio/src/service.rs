//! The generation service: estimate, gate, dispatch, debit, archive.
//!
//! Within one request the order is strict: cost estimation and the
//! affordability check happen before any network dispatch, the debit
//! happens only after the full gateway chain has succeeded (for video,
//! after the asset fetch), and the archive write follows the debit. A
//! failure anywhere leaves both the ledger and the archive untouched.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use manaforge_core::artifact::{ImagePayload, StyledCopy, VideoAsset};
use manaforge_core::error::GenerationError;
use manaforge_core::ledger;
use manaforge_core::model::ArtifactKind;
use manaforge_core::pricing::estimate_cost;
use manaforge_core::request::{CopyStyle, ImageRequest, TextRequest, VideoRequest};
use manaforge_gateway::image::generate_image_batch;
use manaforge_gateway::{
    call_with_retry, poll_video_to_completion, GenerationBackend, PollConfig, RetryPolicy,
};
use manaforge_store::models::archive::NewArchiveEntry;
use manaforge_store::models::user::User;
use manaforge_store::repositories::{ArchiveRepo, UserRepo};
use manaforge_store::JsonStore;

use crate::error::{StudioError, StudioResult};
use crate::events::{
    EventBus, StudioEvent, ENERGY_DEBITED, ENERGY_LOW, ENERGY_RECHARGED, GENERATION_COMPLETED,
};
use crate::notifications::LOW_ENERGY_THRESHOLD;

/// Maximum characters of prompt used for an archive title.
const TITLE_MAX_CHARS: usize = 40;

/// Accounting outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct GenerationReceipt {
    /// Energy charged for the whole request (a batch is billed as one unit).
    pub cost: u32,
    /// Balance after the debit.
    pub balance_after: u32,
    /// Ids of the archive entries written for this request.
    pub archive_ids: Vec<String>,
}

/// Artifact plus its receipt.
#[derive(Debug, Clone)]
pub struct GenerationOutcome<T> {
    pub artifact: T,
    pub receipt: GenerationReceipt,
}

/// The studio orchestrator.
///
/// Generic over the [`GenerationBackend`] so the whole flow runs against a
/// scripted backend in tests without any network I/O.
pub struct Studio<B: GenerationBackend> {
    store: Arc<JsonStore>,
    backend: Arc<B>,
    retry: RetryPolicy,
    poll: PollConfig,
    events: Arc<EventBus>,
}

impl<B: GenerationBackend> Studio<B> {
    pub fn new(
        store: Arc<JsonStore>,
        backend: Arc<B>,
        retry: RetryPolicy,
        poll: PollConfig,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            backend,
            retry,
            poll,
            events,
        }
    }

    /// Generate one piece of commercial copy and archive it.
    pub async fn generate_text(
        &self,
        user_id: &str,
        request: &TextRequest,
    ) -> StudioResult<GenerationOutcome<String>> {
        let user = self.gate(user_id).await?;
        request.validate()?;
        let cost = estimate_cost(request.model, 1);
        self.preflight(&user, cost)?;

        let text = call_with_retry(&self.retry, || self.backend.generate_text(request)).await?;

        let receipt = self
            .settle(
                &user,
                cost,
                vec![(ArtifactKind::Text, title_from(&request.prompt), text.clone())],
            )
            .await?;

        Ok(GenerationOutcome {
            artifact: text,
            receipt,
        })
    }

    /// Generate the three-style copy suite, billed as one unit up front.
    ///
    /// One call per style fans out concurrently; all must succeed for the
    /// suite to settle.
    pub async fn generate_copy_suite(
        &self,
        user_id: &str,
        request: &TextRequest,
    ) -> StudioResult<GenerationOutcome<Vec<StyledCopy>>> {
        let user = self.gate(user_id).await?;
        request.validate()?;
        let styles = CopyStyle::ALL;
        let cost = estimate_cost(request.model, styles.len() as u32);
        self.preflight(&user, cost)?;

        let calls = styles.iter().map(|style| {
            let styled = TextRequest {
                system_instruction: Some(style.instruction().to_string()),
                ..request.clone()
            };
            async move {
                let content =
                    call_with_retry(&self.retry, || self.backend.generate_text(&styled)).await?;
                Ok::<StyledCopy, GenerationError>(StyledCopy {
                    style: *style,
                    content,
                })
            }
        });
        let copies = futures::future::try_join_all(calls).await?;

        let artifacts = copies
            .iter()
            .map(|copy| {
                (
                    ArtifactKind::Text,
                    format!("[{}] {}", copy.style.label(), title_from(&request.prompt)),
                    copy.content.clone(),
                )
            })
            .collect();
        let receipt = self.settle(&user, cost, artifacts).await?;

        Ok(GenerationOutcome {
            artifact: copies,
            receipt,
        })
    }

    /// Generate one image or a batch, billed once up front.
    pub async fn generate_image(
        &self,
        user_id: &str,
        request: &ImageRequest,
    ) -> StudioResult<GenerationOutcome<Vec<ImagePayload>>> {
        let user = self.gate(user_id).await?;
        request.validate()?;
        let cost = estimate_cost(request.model, request.batch_size);
        self.preflight(&user, cost)?;

        let images = generate_image_batch(self.backend.as_ref(), &self.retry, request).await?;

        let artifacts = images
            .iter()
            .map(|image| {
                (
                    ArtifactKind::Image,
                    title_from(&request.prompt),
                    image.to_data_uri(),
                )
            })
            .collect();
        let receipt = self.settle(&user, cost, artifacts).await?;

        Ok(GenerationOutcome {
            artifact: images,
            receipt,
        })
    }

    /// Generate a video: retried submission, fixed-interval polling, then
    /// the asset fetch. The debit happens only after the fetch.
    pub async fn generate_video(
        &self,
        user_id: &str,
        request: &VideoRequest,
        cancel: &CancellationToken,
    ) -> StudioResult<GenerationOutcome<VideoAsset>> {
        let user = self.gate(user_id).await?;
        request.validate()?;
        let model = request.model.video_or_fallback();
        let cost = estimate_cost(model, 1);
        self.preflight(&user, cost)?;

        // Only the submission is retried; a failure mid-poll is fatal for
        // this job rather than silently retried.
        let handle = call_with_retry(&self.retry, || self.backend.submit_video(request)).await?;
        tracing::info!(user_id, operation = %handle.name, "Video job submitted");

        let asset =
            poll_video_to_completion(self.backend.as_ref(), &handle, &self.poll, cancel).await?;

        let receipt = self
            .settle(
                &user,
                cost,
                vec![(
                    ArtifactKind::Video,
                    title_from(&request.prompt),
                    asset.uri.clone(),
                )],
            )
            .await?;

        Ok(GenerationOutcome {
            artifact: asset,
            receipt,
        })
    }

    /// Add recharge energy to an account, returning the new balance.
    pub async fn recharge(&self, user_id: &str, amount: u32) -> StudioResult<u32> {
        let balance = UserRepo::credit_energy(&self.store, user_id, amount).await?;
        tracing::info!(user_id, amount, balance, "Energy recharged");
        self.events.publish(
            StudioEvent::new(ENERGY_RECHARGED)
                .with_user(user_id)
                .with_payload(serde_json::json!({"amount": amount, "balance": balance})),
        );
        Ok(balance)
    }

    /// Current energy balance for an account.
    pub async fn balance(&self, user_id: &str) -> StudioResult<u32> {
        Ok(UserRepo::get(&self.store, user_id).await?.magic_energy)
    }

    /// The underlying document store (archive and notification access).
    pub fn store(&self) -> &Arc<JsonStore> {
        &self.store
    }

    /// The studio event bus.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    // ---- private helpers ----

    /// Load the user and reject guests before any cost is computed.
    async fn gate(&self, user_id: &str) -> StudioResult<User> {
        let user = UserRepo::get(&self.store, user_id).await?;
        if user.is_guest {
            return Err(StudioError::SignInRequired(
                "guests cannot spend magic energy".to_string(),
            ));
        }
        Ok(user)
    }

    /// Pre-flight affordability check. Zero side effects on rejection.
    fn preflight(&self, user: &User, cost: u32) -> StudioResult<()> {
        if !ledger::can_afford(user.magic_energy, cost) {
            return Err(GenerationError::InsufficientBalance {
                required: cost,
                available: user.magic_energy,
            }
            .into());
        }
        Ok(())
    }

    /// Post-success accounting: atomic debit, archive writes, events.
    async fn settle(
        &self,
        user: &User,
        cost: u32,
        artifacts: Vec<(ArtifactKind, String, String)>,
    ) -> StudioResult<GenerationReceipt> {
        let balance_after = UserRepo::debit_energy(&self.store, &user.id, cost).await?;

        let mut archive_ids = Vec::with_capacity(artifacts.len());
        for (kind, title, content) in artifacts {
            let entry = ArchiveRepo::append(
                &self.store,
                NewArchiveEntry {
                    title,
                    kind,
                    content,
                },
            )
            .await?;
            archive_ids.push(entry.id);
        }

        tracing::info!(
            user_id = %user.id,
            cost,
            balance_after,
            entries = archive_ids.len(),
            "Generation settled",
        );

        self.events.publish(
            StudioEvent::new(GENERATION_COMPLETED)
                .with_user(user.id.clone())
                .with_payload(serde_json::json!({"cost": cost, "entries": archive_ids.clone()})),
        );
        self.events.publish(
            StudioEvent::new(ENERGY_DEBITED)
                .with_user(user.id.clone())
                .with_payload(serde_json::json!({"cost": cost, "balance": balance_after})),
        );
        if balance_after < LOW_ENERGY_THRESHOLD {
            self.events.publish(
                StudioEvent::new(ENERGY_LOW)
                    .with_user(user.id.clone())
                    .with_payload(serde_json::json!({"balance": balance_after})),
            );
        }

        Ok(GenerationReceipt {
            cost,
            balance_after,
            archive_ids,
        })
    }
}

/// Derive an archive title from the prompt prefix.
fn title_from(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        trimmed.to_string()
    } else {
        let prefix: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{prefix}...")
    }
}
