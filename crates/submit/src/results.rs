use std::sync::Arc;

use commitment_core::StoredEnvelope;
use commitment_storage::RecordStore;

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation callback declined.
    Cancelled,
    NotFound,
}

/// Read/delete view over stored submissions, independent of the submit
/// pipeline.
///
/// Entries are listed in id order. Since ids start with a millisecond
/// timestamp, that is also submission order.
pub struct ResultsView {
    store: Arc<dyn RecordStore>,
    entries: Vec<StoredEnvelope>,
}

impl ResultsView {
    /// Build a view and load the current entries.
    pub fn load(store: Arc<dyn RecordStore>) -> Self {
        let mut view = Self {
            store,
            entries: Vec::new(),
        };
        view.refresh();
        view
    }

    /// Re-read the store.
    pub fn refresh(&mut self) {
        self.entries = self.store.get_all().into_values().collect();
    }

    pub fn entries(&self) -> &[StoredEnvelope] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&StoredEnvelope> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Delete `id` after `confirm` approves the entry, then reload.
    ///
    /// `confirm` only runs for ids currently present in the store.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> DeleteOutcome
    where
        F: FnOnce(&StoredEnvelope) -> bool,
    {
        let Some(entry) = self.store.get(id) else {
            return DeleteOutcome::NotFound;
        };
        if !confirm(&entry) {
            return DeleteOutcome::Cancelled;
        }
        let outcome = if self.store.delete(id) {
            tracing::info!(%id, "submission deleted");
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        };
        self.refresh();
        outcome
    }
}
