//! Common execution utilities for async and blocking clients.

use serde::de::DeserializeOwned;

use crate::error::{CmqError, MAX_ERROR_BODY_CHARS, Result, truncate_str};
use crate::response::Envelope;

/// Extracts server time from HTTP response Date header.
///
/// Returns `Some(server_timestamp)` if the Date header is present and parseable.
pub(crate) fn extract_server_time(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    if let Some(date_header) = headers.get(reqwest::header::DATE)
        && let Ok(date_str) = date_header.to_str()
        && let Ok(server_time) = chrono::DateTime::parse_from_rfc2822(date_str)
    {
        return Some(server_time.timestamp());
    }
    None
}

/// Calculates smoothed clock offset using exponential moving average.
///
/// Uses 75% old value + 25% new value to reduce jitter.
pub(crate) fn calculate_smoothed_offset(current_offset: i64, new_offset: i64) -> i64 {
    (current_offset * 3 + new_offset) / 4
}

/// Turns a transport response into the raw body.
///
/// CMQ reports application errors inside a 200 JSON body, so any other
/// status is a transport failure.
pub(crate) fn handle_response(status: reqwest::StatusCode, text: String) -> Result<String> {
    if status.is_success() {
        Ok(text)
    } else {
        tracing::warn!(%status, "CMQ endpoint returned non-success status");
        Err(CmqError::Http(format!(
            "HTTP {} with body: {}",
            status,
            truncate_str(&text, MAX_ERROR_BODY_CHARS)
        )))
    }
}

/// Decodes a raw body: envelope first, then the action-specific payload.
///
/// A non-zero `code` becomes [`CmqError::Server`] before the payload is
/// looked at, since error bodies carry only the envelope.
pub(crate) fn decode<T: DeserializeOwned>(action: &str, text: &str) -> Result<(Envelope, T)> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if !envelope.is_success() {
        tracing::debug!(
            action,
            code = envelope.code,
            request_id = %envelope.request_id,
            "CMQ server error"
        );
        return Err(CmqError::Server {
            code: envelope.code,
            message: envelope.message,
            request_id: envelope.request_id,
        });
    }
    let payload = serde_json::from_str(text)?;
    Ok((envelope, payload))
}
