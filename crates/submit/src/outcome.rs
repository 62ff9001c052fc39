//! Explicit results for the best-effort remote calls.

use serde::Serialize;

/// How a remote call ended, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The remote side accepted the request.
    Delivered,
    /// The call failed and a local fallback value was used instead.
    Degraded,
    /// The call failed and the failure was swallowed.
    Suppressed,
}

/// Result of uploading a signature image.
///
/// There is no failure variant: the caller always receives a usable image
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Public URL returned by the image host.
    Delivered { url: String },
    /// Fallback reference (the original encoded image, or the built-in
    /// placeholder when no key is configured).
    Degraded { reference: String, reason: String },
}

impl UploadOutcome {
    /// The image reference to store with the record.
    pub fn reference(&self) -> &str {
        match self {
            UploadOutcome::Delivered { url } => url,
            UploadOutcome::Degraded { reference, .. } => reference,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            UploadOutcome::Delivered { .. } => OutcomeKind::Delivered,
            UploadOutcome::Degraded { .. } => OutcomeKind::Degraded,
        }
    }
}

/// Result of posting a record to the notification endpoint.
///
/// Neither variant fails the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotifyOutcome {
    Delivered { status: u16 },
    /// Non-success status or transport error, logged and swallowed.
    Suppressed { reason: String },
}

impl NotifyOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            NotifyOutcome::Delivered { .. } => OutcomeKind::Delivered,
            NotifyOutcome::Suppressed { .. } => OutcomeKind::Suppressed,
        }
    }
}
