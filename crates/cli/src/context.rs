//! Wiring shared by the CLI commands and the form service.

use std::path::Path;
use std::sync::Arc;

use commitment_core::Config;
use commitment_storage::{FileBackend, LocalRecordStore, RecordStore};
use commitment_submit::{ImgBbClient, Orchestrator, WebhookClient};

use crate::{fail, OutputFormat};

/// Load configuration or exit with the error.
pub(crate) fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string(), output, quiet),
    }
}

/// The file-backed record store under `config.data_dir`.
pub(crate) fn open_store(config: &Config) -> Arc<dyn RecordStore> {
    let backend = FileBackend::new(&config.data_dir).with_quota(config.storage_quota_bytes);
    Arc::new(LocalRecordStore::new(backend))
}

/// An orchestrator talking to the configured image host and webhook.
pub(crate) fn build_orchestrator(config: &Config, store: Arc<dyn RecordStore>) -> Orchestrator {
    Orchestrator::new(
        store,
        Arc::new(ImgBbClient::from_config(config)),
        Arc::new(WebhookClient::from_config(config)),
    )
}
