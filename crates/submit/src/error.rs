use commitment_core::ValidationError;
use commitment_storage::StorageError;

/// Why a submission did not reach *succeeded*.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The draft is incomplete; nothing was uploaded, saved or sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Local persistence failed (quota, I/O, corrupt mapping).
    #[error("failed to submit form: {0}")]
    Storage(#[from] StorageError),

    /// Another submission is still running.
    #[error("a submission is already in progress")]
    InProgress,

    /// A pipeline task died unexpectedly.
    #[error("failed to submit form: {0}")]
    Internal(String),
}
