//! Notification client: forwards a saved record to a webhook.

use async_trait::async_trait;

use commitment_core::{Config, WebhookPayload};

use crate::outcome::NotifyOutcome;

/// Best-effort delivery of a finished submission.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Never fails; see [`NotifyOutcome`].
    async fn notify(&self, payload: &WebhookPayload) -> NotifyOutcome;
}

/// Posts the payload as JSON to a fixed URL. No retry.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.webhook_url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookClient {
    async fn notify(&self, payload: &WebhookPayload) -> NotifyOutcome {
        tracing::info!(url = %self.url, id = %payload.id, "sending data to webhook");

        // ureq is synchronous, so wrap in spawn_blocking
        let url = self.url.clone();
        let payload = payload.clone();
        let result = tokio::task::spawn_blocking(move || post_json(&url, &payload))
            .await
            .map_err(|e| format!("webhook task failed: {}", e))
            .and_then(|r| r);

        match result {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(status, "webhook sent successfully");
                NotifyOutcome::Delivered { status }
            }
            Ok(status) => {
                tracing::warn!(status, "webhook returned non-success status; continuing");
                NotifyOutcome::Suppressed {
                    reason: format!("webhook returned status {}", status),
                }
            }
            Err(reason) => {
                tracing::warn!(error = %reason, "webhook error; continuing");
                NotifyOutcome::Suppressed { reason }
            }
        }
    }
}

fn post_json(url: &str, payload: &WebhookPayload) -> Result<u16, String> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let response = agent
        .post(url)
        .header("Accept", "application/json")
        .send_json(payload)
        .map_err(|e| format!("could not reach webhook: {}", e))?;

    Ok(response.status().as_u16())
}
