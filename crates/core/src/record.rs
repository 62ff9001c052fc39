use serde::{Deserialize, Serialize};

/// One employee's acknowledgment, as handed to storage and the webhook.
///
/// Serialized with camelCase keys (`fullName`, `signatureUrl`, ...) so the
/// persisted layout matches what earlier form versions wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub position: String,
    /// Public URL from the image host, or the encoded image itself when the
    /// upload degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
    /// ISO-8601 instant, millisecond precision.
    #[serde(default)]
    pub submitted_at: String,
}

/// A [`SubmissionRecord`] as persisted, with its generated identifier and
/// the local save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEnvelope {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub id: String,
    pub saved_at: String,
}

/// Body posted to the notification endpoint.
///
/// `id` and `localStorageKey` always carry the same generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub id: String,
    pub local_storage_key: String,
}

impl WebhookPayload {
    pub fn new(record: SubmissionRecord, id: &str) -> Self {
        Self {
            record,
            id: id.to_string(),
            local_storage_key: id.to_string(),
        }
    }
}

/// Form input collected before submit.
///
/// `signature` is an encoded image string (usually a PNG data URI) or empty
/// when nothing has been drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub signature: String,
}

impl FormDraft {
    pub fn new(full_name: &str, position: &str, signature: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            position: position.to_string(),
            signature: signature.to_string(),
        }
    }

    /// Replace the signature with the latest capture (empty on clear).
    pub fn set_signature(&mut self, encoded: &str) {
        self.signature = encoded.to_string();
    }

    /// Reset every field back to empty.
    pub fn clear(&mut self) {
        self.full_name.clear();
        self.position.clear();
        self.signature.clear();
    }

    /// Build the record that goes to storage, attaching the uploaded image
    /// reference and submission time.
    pub fn to_record(&self, signature_url: String, submitted_at: String) -> SubmissionRecord {
        SubmissionRecord {
            full_name: self.full_name.clone(),
            position: self.position.clone(),
            signature_url: Some(signature_url),
            submitted_at,
        }
    }
}
