//! commitment-core: data model and shared helpers for the employee
//! commitment form.
//!
//! # Public API
//!
//! - [`SubmissionRecord`], [`StoredEnvelope`], [`WebhookPayload`] -- the
//!   record as submitted, as persisted, and as forwarded
//! - [`FormDraft`] and [`validate_draft()`] -- in-memory form input and the
//!   completeness check run before any side effect
//! - [`Config`] -- layered configuration (defaults, TOML file, environment)
//! - [`commitment_text()`] -- the fixed commitment text shown on the form
//! - [`generate_id()`] / [`now_iso()`] -- identifier and timestamp helpers

pub mod clock;
pub mod config;
pub mod error;
pub mod record;
pub mod text;
pub mod validate;

// ── Convenience re-exports ───────────────────────────────────────────

pub use clock::{format_iso, generate_id, now_iso, parse_iso};
pub use config::Config;
pub use error::{ConfigError, ValidationError};
pub use record::{FormDraft, StoredEnvelope, SubmissionRecord, WebhookPayload};
pub use text::{commitment_text, format_display_datetime, format_long_date};
pub use validate::validate_draft;

/// Key under which the record mapping is persisted.
pub const STORAGE_KEY: &str = "bankCommitmentForms";
