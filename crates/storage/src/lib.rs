//! commitment-storage: persistence for submitted commitment forms.
//!
//! A single key in a [`KeyValueBackend`] holds a JSON object mapping
//! generated identifiers to [`StoredEnvelope`](commitment_core::StoredEnvelope)s.
//! [`LocalRecordStore`] implements the [`RecordStore`] operations on top of
//! any backend.

mod backend;
pub mod conformance;
mod error;
mod local;
mod traits;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StorageError;
pub use local::LocalRecordStore;
pub use traits::{RecordMap, RecordStore};
