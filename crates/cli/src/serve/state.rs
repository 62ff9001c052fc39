//! Application state.

use std::sync::Arc;
use std::time::Duration;

use commitment_core::Config;
use commitment_storage::RecordStore;
use commitment_submit::Orchestrator;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) config: Config,
    /// The single submit pipeline; concurrent submits get 409.
    pub(crate) orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub(crate) fn new(config: Config, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub(crate) fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(self.orchestrator.store())
    }

    /// How long a success stays visible before the form resets.
    pub(crate) fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.config.reset_delay_ms)
    }
}
