//! The submit state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use commitment_core::{now_iso, validate_draft, FormDraft, SubmissionRecord, WebhookPayload};
use commitment_storage::RecordStore;

use crate::error::SubmitError;
use crate::notify::Notifier;
use crate::outcome::{NotifyOutcome, UploadOutcome};
use crate::state::{FailureKind, SubmitState};
use crate::upload::ImageHost;

/// Receives every state change, in order.
pub trait TransitionObserver: Send + Sync {
    fn on_transition(&self, from: &SubmitState, to: &SubmitState);
}

/// Everything a successful submission produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReport {
    pub id: String,
    pub record: SubmissionRecord,
    pub upload: UploadOutcome,
    pub notify: NotifyOutcome,
}

/// Sequences validation, upload, local save and notification for one
/// submission at a time.
///
/// The current [`SubmitState`] is published on a `watch` channel; views
/// subscribe instead of keeping their own flags. A submit that starts while
/// another is running is rejected with [`SubmitError::InProgress`] and
/// leaves the state untouched. Once started, a submission runs to an
/// outcome.
pub struct Orchestrator {
    store: Arc<dyn RecordStore>,
    image_host: Arc<dyn ImageHost>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SubmitState>,
    observers: Vec<Arc<dyn TransitionObserver>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however `submit` exits.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        image_host: Arc<dyn ImageHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SubmitState::Idle);
        Self {
            store,
            image_host,
            notifier,
            state,
            observers: Vec::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TransitionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Run one submission to completion.
    pub async fn submit(&self, draft: &FormDraft) -> Result<SubmitReport, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("submit rejected: a submission is already in progress");
            return Err(SubmitError::InProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.transition(SubmitState::Validating);
        if let Err(e) = validate_draft(draft) {
            return Err(self.fail(FailureKind::Validation, e.into()));
        }

        self.transition(SubmitState::Uploading);
        let upload = self.image_host.upload(&draft.signature).await;

        self.transition(SubmitState::Persisting);
        let record = draft.to_record(upload.reference().to_string(), now_iso());
        let id = match self.save(&record).await {
            Ok(id) => id,
            Err(e) => {
                let kind = match e {
                    SubmitError::Storage(_) => FailureKind::Persistence,
                    _ => FailureKind::Internal,
                };
                return Err(self.fail(kind, e));
            }
        };

        self.transition(SubmitState::Notifying);
        let notify = self
            .notifier
            .notify(&WebhookPayload::new(record.clone(), &id))
            .await;

        self.transition(SubmitState::Succeeded {
            id: id.clone(),
            upload: upload.kind(),
            notify: notify.kind(),
        });
        tracing::info!(%id, "form submitted");

        Ok(SubmitReport {
            id,
            record,
            upload,
            notify,
        })
    }

    /// Return to *idle* after an outcome. Does nothing (and returns false)
    /// while a submission is running.
    pub fn reset(&self) -> bool {
        if self.in_flight.load(Ordering::Acquire) {
            return false;
        }
        self.transition(SubmitState::Idle);
        true
    }

    /// Reset after `delay`, unless a newer submission has replaced the
    /// success identified by `id` in the meantime.
    pub fn schedule_reset(
        self: &Arc<Self>,
        id: String,
        delay: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let still_current =
                matches!(&*this.state.borrow(), SubmitState::Succeeded { id: cur, .. } if *cur == id);
            if still_current {
                this.reset();
            }
        })
    }

    async fn save(&self, record: &SubmissionRecord) -> Result<String, SubmitError> {
        let store = Arc::clone(&self.store);
        let record = record.clone();
        tokio::task::spawn_blocking(move || store.save(&record))
            .await
            .map_err(|e| SubmitError::Internal(e.to_string()))?
            .map_err(SubmitError::from)
    }

    fn fail(&self, kind: FailureKind, error: SubmitError) -> SubmitError {
        tracing::warn!(error = %error, "submission failed");
        self.transition(SubmitState::Failed {
            kind,
            message: error.to_string(),
        });
        error
    }

    fn transition(&self, next: SubmitState) {
        let previous = self.state.send_replace(next.clone());
        tracing::debug!(from = previous.name(), to = next.name(), "submit state");
        for observer in &self.observers {
            observer.on_transition(&previous, &next);
        }
    }
}
