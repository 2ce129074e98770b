//! Errors raised by upstream adapters

use thiserror::Error;

/// Failure fetching from an upstream HTTP source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Upstream answered with a non-success status
    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}

/// Turn a non-success response into a [`SourceError::Status`]
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status { status, body })
}
