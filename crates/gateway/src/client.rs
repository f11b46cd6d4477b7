//! HTTP client for the hosted generation endpoints.
//!
//! [`GenerationClient`] holds the connection configuration and a pooled
//! [`reqwest::Client`]. The operation methods live in the sibling modules
//! (`text`, `image`, `video`); this module provides the transport helpers
//! and failure classification they share.

use manaforge_core::error::GenerationError;

/// Connection configuration for the hosted generation API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the provider, e.g. `https://aihubmix.com/v1`.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
}

/// Default provider base URL.
const DEFAULT_BASE_URL: &str = "https://aihubmix.com/v1";

impl GatewayConfig {
    /// Load gateway configuration from environment variables.
    ///
    /// | Env Var          | Required | Default                   |
    /// |------------------|----------|---------------------------|
    /// | `GENAI_BASE_URL` | no       | `https://aihubmix.com/v1` |
    /// | `GENAI_API_KEY`  | **yes**  | --                        |
    ///
    /// # Panics
    ///
    /// Panics if `GENAI_API_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("GENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key =
            std::env::var("GENAI_API_KEY").expect("GENAI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "GENAI_API_KEY must not be empty");

        Self { base_url, api_key }
    }
}

/// HTTP client for a single provider account.
pub struct GenerationClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GenerationClient {
    /// Create a new client with its own connection pool.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across multiple accounts).
    pub fn with_client(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    /// POST a JSON body to a path under the base URL, bearer-authenticated.
    ///
    /// Used by the chat-completion protocol.
    pub(crate) async fn post_chat<B, T>(&self, path: &str, body: &B) -> Result<T, GenerationError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response).await
    }

    /// POST a JSON body to a model-scoped native endpoint, key-authenticated.
    ///
    /// Builds `{base}/models/{model}:{verb}` and sends the API key in the
    /// `x-goog-api-key` header the native protocol expects.
    pub(crate) async fn post_model<B, T>(
        &self,
        model: &str,
        verb: &str,
        body: &B,
    ) -> Result<T, GenerationError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/models/{model}:{verb}", self.config.base_url))
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response).await
    }

    /// GET a JSON resource by its server-assigned name (operation polling).
    pub(crate) async fn get_named<T>(&self, name: &str) -> Result<T, GenerationError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(format!(
                "{}/{}",
                self.config.base_url,
                name.trim_start_matches('/')
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response).await
    }

    /// GET binary content from an absolute URI (asset download).
    pub(crate) async fn get_bytes(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .client
            .get(uri)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(transport)?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await.map_err(transport)?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a classified [`GenerationError`] carrying
    /// the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::from_status(status.as_u16(), body));
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationError> {
        let response = Self::ensure_success(response).await?;
        response.json::<T>().await.map_err(transport)
    }
}

/// Map a transport-level failure into the error taxonomy.
fn transport(err: reqwest::Error) -> GenerationError {
    GenerationError::Transport(err.to_string())
}
