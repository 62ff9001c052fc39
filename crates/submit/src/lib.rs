//! commitment-submit: the submit pipeline behind the commitment form.
//!
//! [`Orchestrator`] validates a [`FormDraft`](commitment_core::FormDraft),
//! then runs upload -> persist -> notify strictly in sequence, publishing
//! each [`SubmitState`] to subscribers. Remote failures never block a
//! submission: [`ImageHost`] degrades to the original image and
//! [`Notifier`] suppresses delivery errors, both reported through explicit
//! outcome types. [`ResultsView`] is the independent read/delete path over
//! stored submissions.

mod error;
mod notify;
mod orchestrator;
mod outcome;
mod results;
mod state;
mod upload;

pub use error::SubmitError;
pub use notify::{Notifier, WebhookClient};
pub use orchestrator::{Orchestrator, SubmitReport, TransitionObserver};
pub use outcome::{NotifyOutcome, OutcomeKind, UploadOutcome};
pub use results::{DeleteOutcome, ResultsView};
pub use state::{FailureKind, SubmitState};
pub use upload::{ImageHost, ImgBbClient, UploadError, PLACEHOLDER_IMAGE};

#[cfg(test)]
pub(crate) mod test_support;
