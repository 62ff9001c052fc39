//! Conformance test suite for `RecordStore` implementations.
//!
//! A backend-agnostic suite any `RecordStore` can run to verify the
//! observable contract:
//!
//! - **Save**: identifiers are unique and returned envelopes carry them
//! - **Read**: round-trips preserve every field; repeated reads agree
//! - **Delete**: absent ids report `false` and leave the mapping untouched;
//!   present ids remove exactly one entry
//!
//! # Usage
//!
//! ```ignore
//! use commitment_storage::conformance::run_conformance_suite;
//! use commitment_storage::{LocalRecordStore, MemoryBackend};
//!
//! #[test]
//! fn memory_conformance() {
//!     let report = run_conformance_suite(|| LocalRecordStore::new(MemoryBackend::new()));
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod delete;
mod read;
mod save;

use std::fmt;

use commitment_core::SubmissionRecord;

use crate::RecordStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category ("save", "read", "delete").
    pub category: String,
    pub name: String,
    pub passed: bool,
    /// Failure detail.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        let (passed, message) = match result {
            Ok(()) => (true, None),
            Err(msg) => (false, Some(msg)),
        };
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed,
            message,
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL [{}/{}]: {}",
                r.category,
                r.name,
                r.message.as_deref().unwrap_or("(no message)")
            )?;
        }
        Ok(())
    }
}

/// Run the full conformance suite.
///
/// `factory` is called once per test and must return a fresh, empty store.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: RecordStore,
    F: Fn() -> S,
{
    let mut results = Vec::new();

    results.extend(save::run_save_tests(&factory));
    results.extend(read::run_read_tests(&factory));
    results.extend(delete::run_delete_tests(&factory));

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

fn make_record(full_name: &str, position: &str) -> SubmissionRecord {
    SubmissionRecord {
        full_name: full_name.to_string(),
        position: position.to_string(),
        signature_url: Some("https://i.ibb.co/test/signature.png".to_string()),
        submitted_at: "2026-01-01T00:00:00.000Z".to_string(),
    }
}

fn save_or_fail<S: RecordStore>(store: &S, record: &SubmissionRecord) -> Result<String, String> {
    store
        .save(record)
        .map_err(|e| format!("save failed: {}", e))
}
