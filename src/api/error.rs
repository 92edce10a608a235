use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be built; no network traffic happened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The network call itself failed.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call completed but the response is unusable: a non-success
    /// status, or a nominal success carrying no body.
    #[error("bad response: {0}")]
    BadResponse(String),

    /// A body was returned but does not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid dragging huge payloads into logs
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let truncated: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", truncated, body.len())
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::BadResponse(format!("status {}: {}", status, Self::truncate_body(body)))
    }
}
