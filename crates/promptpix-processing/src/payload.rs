//! Decoding of base64 image payloads returned by providers

use crate::error::ProcessingError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Decode a base64 image payload, accepting an optional `data:<mime>;base64,` prefix.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, ProcessingError> {
    let encoded = strip_data_url_prefix(payload.trim());

    // Some providers wrap long payloads across lines.
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ProcessingError::MalformedPayload(format!("invalid base64: {}", e)))
}

fn strip_data_url_prefix(payload: &str) -> &str {
    if !payload.starts_with("data:") {
        return payload;
    }
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}
