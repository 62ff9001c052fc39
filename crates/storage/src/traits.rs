use std::collections::BTreeMap;

use commitment_core::{StoredEnvelope, SubmissionRecord};

use crate::error::StorageError;

/// Identifier -> envelope, ordered by identifier (and therefore by save time).
pub type RecordMap = BTreeMap<String, StoredEnvelope>;

/// The operations the form needs from local persistence.
///
/// Only `save` surfaces errors. Reads and deletes swallow backend failures:
/// an unreadable store looks empty and a failed delete reports `false`.
///
/// There is deliberately no update operation; an envelope is immutable once
/// saved and leaves the store only through `delete`.
pub trait RecordStore: Send + Sync {
    /// Persist `record` under a freshly generated identifier, stamping the
    /// save time. Returns the identifier.
    fn save(&self, record: &SubmissionRecord) -> Result<String, StorageError>;

    /// Every stored envelope, or an empty map when storage is empty or
    /// unreadable.
    fn get_all(&self) -> RecordMap;

    /// A single envelope; `None` when absent or unreadable.
    fn get(&self, id: &str) -> Option<StoredEnvelope> {
        self.get_all().remove(id)
    }

    /// Remove `id`. Returns whether an entry was actually removed.
    fn delete(&self, id: &str) -> bool;
}
