//! Environment-driven configuration for the studio runtime.

use std::path::PathBuf;
use std::time::Duration;

use manaforge_gateway::{GatewayConfig, PollConfig, RetryPolicy};

use crate::auth::token::TokenConfig;

/// Runtime configuration loaded from environment variables.
///
/// Everything except the provider credentials and the token secret has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Where the JSON document store lives.
    pub data_dir: PathBuf,
    /// Provider connection settings.
    pub gateway: GatewayConfig,
    /// Rate-limit retry policy for dispatch.
    pub retry: RetryPolicy,
    /// Video polling cadence and wall-clock fence.
    pub poll: PollConfig,
    /// Session token settings.
    pub tokens: TokenConfig,
}

impl StudioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default  |
    /// |----------------------------|----------|
    /// | `MANAFORGE_DATA_DIR`       | `./data` |
    /// | `RETRY_MAX_ATTEMPTS`       | `3`      |
    /// | `RETRY_INITIAL_DELAY_MS`   | `2000`   |
    /// | `VIDEO_POLL_INTERVAL_SECS` | `8`      |
    /// | `VIDEO_POLL_TIMEOUT_SECS`  | `600`    |
    ///
    /// The `GENAI_*` and `JWT_*` variables are documented on
    /// [`GatewayConfig::from_env`] and [`TokenConfig::from_env`].
    pub fn from_env() -> Self {
        let data_dir: PathBuf = std::env::var("MANAFORGE_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let max_retries: u32 = std::env::var("RETRY_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .expect("RETRY_MAX_ATTEMPTS must be a valid u32");

        let initial_delay_ms: u64 = std::env::var("RETRY_INITIAL_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .expect("RETRY_INITIAL_DELAY_MS must be a valid u64");

        let poll_interval_secs: u64 = std::env::var("VIDEO_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .expect("VIDEO_POLL_INTERVAL_SECS must be a valid u64");

        let poll_timeout_secs: u64 = std::env::var("VIDEO_POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .expect("VIDEO_POLL_TIMEOUT_SECS must be a valid u64");

        Self {
            data_dir,
            gateway: GatewayConfig::from_env(),
            retry: RetryPolicy {
                max_retries,
                initial_delay: Duration::from_millis(initial_delay_ms),
            },
            poll: PollConfig {
                interval: Duration::from_secs(poll_interval_secs),
                max_wait: Some(Duration::from_secs(poll_timeout_secs)),
            },
            tokens: TokenConfig::from_env(),
        }
    }
}
