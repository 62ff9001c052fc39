//! Completeness check for a [`FormDraft`].

use crate::error::ValidationError;
use crate::record::FormDraft;

/// Required text fields, in the order they are reported.
const REQUIRED_FIELDS: [&str; 2] = ["fullName", "position"];

/// Check that a draft has a full name, a position, and a signature.
///
/// Only empty strings count as missing. The first missing item wins.
pub fn validate_draft(draft: &FormDraft) -> Result<(), ValidationError> {
    for field in REQUIRED_FIELDS {
        let value = match field {
            "fullName" => &draft.full_name,
            _ => &draft.position,
        };
        if value.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    if draft.signature.is_empty() {
        return Err(ValidationError::MissingSignature);
    }

    Ok(())
}
