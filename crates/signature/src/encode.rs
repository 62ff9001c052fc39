//! Encoded image strings: `data:image/<kind>;base64,<payload>`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::SignatureError;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Wrap PNG bytes as a data URI.
pub fn encode_png_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png))
}

/// Drop a leading `data:image/<letters>;base64,` marker, if present.
///
/// Anything else (including other media types) is returned unchanged.
pub fn strip_data_uri_prefix(encoded: &str) -> &str {
    let Some(rest) = encoded.strip_prefix("data:image/") else {
        return encoded;
    };
    let Some((kind, payload)) = rest.split_once(";base64,") else {
        return encoded;
    };
    if !kind.is_empty() && kind.bytes().all(|b| b.is_ascii_lowercase()) {
        payload
    } else {
        encoded
    }
}

/// Decode an encoded image string (with or without the data-URI marker).
pub fn decode_data_uri(encoded: &str) -> Result<Vec<u8>, SignatureError> {
    Ok(BASE64.decode(strip_data_uri_prefix(encoded).trim())?)
}
