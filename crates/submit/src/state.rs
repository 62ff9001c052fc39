use serde::Serialize;

use crate::outcome::OutcomeKind;

/// Which check or step ended a submission in *failed*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Persistence,
    Internal,
}

/// Where the submit action currently is.
///
/// `idle -> validating -> uploading -> persisting -> notifying -> succeeded`,
/// with `validating` and `persisting` able to jump to `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    Validating,
    Uploading,
    Persisting,
    Notifying,
    Succeeded {
        id: String,
        upload: OutcomeKind,
        notify: OutcomeKind,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl SubmitState {
    /// True for the states between a submit trigger and its outcome.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmitState::Validating
                | SubmitState::Uploading
                | SubmitState::Persisting
                | SubmitState::Notifying
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmitState::Succeeded { .. } | SubmitState::Failed { .. })
    }

    /// Short name used in logs and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            SubmitState::Idle => "idle",
            SubmitState::Validating => "validating",
            SubmitState::Uploading => "uploading",
            SubmitState::Persisting => "persisting",
            SubmitState::Notifying => "notifying",
            SubmitState::Succeeded { .. } => "succeeded",
            SubmitState::Failed { .. } => "failed",
        }
    }
}
