//! Store error types.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure reading or writing a collection.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file holds malformed JSON, or a record failed to encode.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// An atomic debit found less energy than the operation needs.
    #[error("Insufficient energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },
}
