//! `manaforge` CLI: run one generation from the command line.
//!
//! Usage: `manaforge <text|image|video> "<prompt>" [user-id]`
//!
//! Without a user id the first non-guest account in the store is used,
//! creating a local one on first run.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manaforge_core::model::ModelId;
use manaforge_core::request::{AspectRatio, ImageRequest, Resolution, TextRequest, VideoRequest};
use manaforge_gateway::GenerationClient;
use manaforge_store::models::user::{CreateUser, Tier, STARTING_ENERGY};
use manaforge_store::repositories::UserRepo;
use manaforge_store::JsonStore;
use manaforge_studio::config::StudioConfig;
use manaforge_studio::events::EventBus;
use manaforge_studio::notifications::NotificationWriter;
use manaforge_studio::service::{GenerationReceipt, Studio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manaforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (kind, prompt) = match (args.next(), args.next()) {
        (Some(kind), Some(prompt)) => (kind, prompt),
        _ => {
            eprintln!("usage: manaforge <text|image|video> \"<prompt>\" [user-id]");
            std::process::exit(2);
        }
    };

    let config = StudioConfig::from_env();
    let store = Arc::new(JsonStore::open(&config.data_dir).await?);
    let backend = Arc::new(GenerationClient::new(config.gateway.clone()));
    let events = Arc::new(EventBus::default());

    tokio::spawn(NotificationWriter::run(store.clone(), events.subscribe()));

    let studio = Studio::new(
        store.clone(),
        backend,
        config.retry.clone(),
        config.poll.clone(),
        events,
    );

    let user_id = match args.next() {
        Some(id) => id,
        None => local_account(&store).await?,
    };

    match kind.as_str() {
        "text" => {
            let request = TextRequest {
                prompt,
                model: ModelId::TextFlash,
                system_instruction: None,
            };
            let outcome = studio.generate_text(&user_id, &request).await?;
            println!("{}", outcome.artifact);
            report(&outcome.receipt);
        }
        "image" => {
            let request = ImageRequest {
                prompt,
                model: ModelId::ImageFlash,
                aspect_ratio: AspectRatio::Square,
                image_size: None,
                reference_image: None,
                batch_size: 1,
            };
            let outcome = studio.generate_image(&user_id, &request).await?;
            for (image, id) in outcome.artifact.iter().zip(&outcome.receipt.archive_ids) {
                let path = config.data_dir.join(format!("{id}.datauri"));
                tokio::fs::write(&path, image.to_data_uri()).await?;
                println!("saved {}", path.display());
            }
            report(&outcome.receipt);
        }
        "video" => {
            let cancel = CancellationToken::new();
            let request = VideoRequest {
                prompt,
                model: ModelId::VideoFast,
                aspect_ratio: AspectRatio::SixteenNine,
                resolution: Resolution::P720,
                reference_image: None,
            };
            let outcome = studio.generate_video(&user_id, &request, &cancel).await?;
            let path = config.data_dir.join(format!(
                "{}.mp4",
                outcome.receipt.archive_ids.first().map(String::as_str).unwrap_or("video")
            ));
            tokio::fs::write(&path, &outcome.artifact.bytes).await?;
            println!(
                "saved {} bytes to {}",
                outcome.artifact.bytes.len(),
                path.display()
            );
            report(&outcome.receipt);
        }
        other => {
            eprintln!("unknown kind: {other} (expected text, image, or video)");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Reuse the first non-guest account, creating one on first run.
async fn local_account(store: &JsonStore) -> anyhow::Result<String> {
    if let Some(user) = UserRepo::list(store).await?.into_iter().find(|u| !u.is_guest) {
        return Ok(user.id);
    }

    let user = UserRepo::create(
        store,
        CreateUser {
            name: "Local Wizard".to_string(),
            email: None,
            password_hash: None,
            tier: Tier::Free,
            is_guest: false,
            magic_energy: STARTING_ENERGY,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, "Created local account");
    Ok(user.id)
}

fn report(receipt: &GenerationReceipt) {
    println!(
        "energy spent: {}, balance: {}, archived: {}",
        receipt.cost,
        receipt.balance_after,
        receipt.archive_ids.join(", ")
    );
}
