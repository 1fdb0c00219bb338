//! Errors raised below the gateway. None of them reach the user as-is: the
//! gateway turns them into a failed [`SubmissionResult`](super::SubmissionResult).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Underlying HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The transport could not produce a response.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
