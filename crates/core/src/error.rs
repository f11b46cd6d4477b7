//! The generation error taxonomy.
//!
//! Every failure a generation call can produce is classified into one of
//! these kinds so a caller can route it to the right recovery path:
//! rate limits are transiently retryable, credential problems need a
//! re-selection flow, balance problems are fixable locally with a top-up,
//! and an empty result is a hard failure rather than an empty success.

/// Marker the provider uses in response bodies when a quota is exhausted.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Marker the provider uses when the addressed entity does not exist,
/// typically a sign of a stale or mis-scoped credential.
const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Provider rate limit or quota exhaustion; retried by the retry policy
    /// and surfaced only after the retry budget is spent.
    #[error("Rate limited by provider: {message}")]
    RateLimited { message: String },

    /// Credential invalid, expired, or the provider entity was not found.
    #[error("Authentication or permission failure: {message}")]
    AuthOrPermission { message: String },

    /// Transport succeeded but the response carried no extractable artifact.
    #[error("No {what} found in response")]
    EmptyResult { what: &'static str },

    /// Pre-flight balance check failed; no network call was made.
    #[error("Insufficient energy: need {required}, have {available}")]
    InsufficientBalance { required: u32, available: u32 },

    /// Request rejected at the gateway boundary before dispatch.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider returned a non-success status outside the kinds above.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Network, TLS, or response-parsing failure, or a provider-side job
    /// failure with no HTTP status of its own.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A long-running operation did not complete within the wall-clock fence.
    #[error("Generation timed out after {waited_secs}s")]
    TimedOut { waited_secs: u64 },

    /// The caller cancelled while waiting.
    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Classify a non-success HTTP response into an error kind.
    ///
    /// HTTP 429 and quota-exhaustion markers become [`RateLimited`]
    /// (eligible for retry); 401/403 and entity-not-found markers become
    /// [`AuthOrPermission`]; everything else keeps its status and body as
    /// an [`Api`] error for diagnostics.
    ///
    /// [`RateLimited`]: GenerationError::RateLimited
    /// [`AuthOrPermission`]: GenerationError::AuthOrPermission
    /// [`Api`]: GenerationError::Api
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 || body.contains(RESOURCE_EXHAUSTED) {
            Self::RateLimited {
                message: format!("HTTP {status}: {body}"),
            }
        } else if status == 401 || status == 403 || body.contains(ENTITY_NOT_FOUND) {
            Self::AuthOrPermission { message: body }
        } else {
            Self::Api { status, body }
        }
    }

    /// Whether the retry policy may transparently retry this failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
