/// All errors that can be returned by a backend or record store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Writing the value would exceed the backend's byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// The persisted mapping could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend itself could not be reached (I/O, poisoned lock, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Unavailable(e.to_string())
    }
}
