//! Error types for nail-art runs.

use std::time::Duration;

/// Longest provider error body we keep for display.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while validating or editing a hand photo.
#[derive(Debug, thiserror::Error)]
pub enum NailVizError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Account is out of credits or quota.
    #[error("billing error: {0}")]
    Billing(String),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Uploaded file is not one of the accepted image types.
    #[error("unsupported upload: {0}")]
    UnsupportedUpload(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., writing the scratch file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider answered 2xx but the body was not what we expected.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for nail-art operations.
pub type Result<T> = std::result::Result<T, NailVizError>;

/// Maps a non-2xx OpenAI response to an error variant.
pub(crate) fn classify_api_error(
    status: u16,
    text: &str,
    headers: &reqwest::header::HeaderMap,
) -> NailVizError {
    let text = sanitize_error_message(text);
    if status == 402 {
        return NailVizError::Billing(text);
    }
    if status == 413 {
        return NailVizError::InvalidRequest(
            "Image too large. Reduce image size and try again.".into(),
        );
    }
    if status == 429 {
        // insufficient_quota is not transient, unlike a plain rate limit
        if text.contains("insufficient_quota") || text.contains("exceeded your current quota") {
            return NailVizError::Billing(text);
        }
        let retry_after = parse_retry_after(headers).map(Duration::from_secs);
        return NailVizError::RateLimited { retry_after };
    }
    if status == 401 || status == 403 {
        return NailVizError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety") || lower.contains("blocked") || lower.contains("content_policy")
    {
        return NailVizError::ContentBlocked(text);
    }
    NailVizError::Api {
        status,
        message: text,
    }
}

/// Reads a `retry-after` header expressed in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Redacts anything that looks like an API key and caps the length.
///
/// Provider error bodies end up in the rendered page, so they must never echo
/// a bearer token back to the browser.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let redacted: Vec<String> = text
        .split(' ')
        .map(|word| {
            if word.trim_start_matches(['"', '\'', '(']).starts_with("sk-") {
                "[REDACTED]".to_string()
            } else {
                word.to_string()
            }
        })
        .collect();
    let joined = redacted.join(" ");
    let trimmed = joined.trim();

    if trimmed.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let cut: String = trimmed.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
