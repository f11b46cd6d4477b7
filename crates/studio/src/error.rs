//! Studio-level error type.

use manaforge_core::error::GenerationError;
use manaforge_store::error::StoreError;

/// Error surface for studio operations.
///
/// Wraps [`GenerationError`] for gateway failures and [`StoreError`] for
/// persistence failures; account failures carry their own variants so a
/// caller can route the user to the right recovery step.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A failure from the generation gateway or its pre-flight checks.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A failure from the local document store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation requires a signed-in, non-guest account.
    #[error("Sign-in required: {0}")]
    SignInRequired(String),

    /// Credential verification or token issuance failed.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Convenience alias for studio results.
pub type StudioResult<T> = Result<T, StudioError>;
