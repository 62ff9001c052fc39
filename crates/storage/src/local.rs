use std::sync::Mutex;

use commitment_core::{generate_id, now_iso, StoredEnvelope, SubmissionRecord, STORAGE_KEY};

use crate::backend::KeyValueBackend;
use crate::error::StorageError;
use crate::traits::{RecordMap, RecordStore};

/// [`RecordStore`] that keeps the whole mapping as one JSON document under a
/// single backend key.
///
/// Every mutation is a read-modify-write of that document, serialized by an
/// internal lock so concurrent handlers cannot drop each other's writes.
pub struct LocalRecordStore<B> {
    backend: B,
    key: String,
    write_lock: Mutex<()>,
}

impl<B: KeyValueBackend> LocalRecordStore<B> {
    /// Store under the default key, `bankCommitmentForms`.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn load(&self) -> Result<RecordMap, StorageError> {
        match self.backend.get_item(&self.key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(RecordMap::new()),
        }
    }

    fn store(&self, map: &RecordMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(map)?;
        self.backend.set_item(&self.key, &raw)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("record store lock poisoned".to_string()))
    }

    fn try_delete(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        let mut map = self.load()?;
        if map.remove(id).is_none() {
            return Ok(false);
        }
        self.store(&map)?;
        Ok(true)
    }
}

impl<B: KeyValueBackend> RecordStore for LocalRecordStore<B> {
    fn save(&self, record: &SubmissionRecord) -> Result<String, StorageError> {
        let _guard = self.lock()?;
        let mut map = self.load().inspect_err(|e| {
            tracing::error!(error = %e, "error reading stored forms before save");
        })?;

        let id = generate_id();
        map.insert(
            id.clone(),
            StoredEnvelope {
                record: record.clone(),
                id: id.clone(),
                saved_at: now_iso(),
            },
        );

        self.store(&map).inspect_err(|e| {
            tracing::error!(error = %e, "error saving form to local storage");
        })?;
        tracing::debug!(%id, "form saved to local storage");
        Ok(id)
    }

    fn get_all(&self) -> RecordMap {
        self.load().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error reading from local storage");
            RecordMap::new()
        })
    }

    fn delete(&self, id: &str) -> bool {
        self.try_delete(id).unwrap_or_else(|e| {
            tracing::error!(error = %e, %id, "error deleting from local storage");
            false
        })
    }
}
