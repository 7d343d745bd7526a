//! JobTech client error types.

use std::sync::Arc;

/// Errors from the JobSearch API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobtechError {
    /// The requested ad does not exist upstream (HTTP 404 on `/ad/{id}`).
    #[error("job not found: {0}")]
    NotFound(String),

    /// Non-success HTTP response.
    #[error("JobSearch API error {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The configured API key header name or value is not a valid HTTP header.
    #[error("invalid API key header: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for JobtechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { JobtechError::Timeout } else { JobtechError::Network(Arc::new(err)) }
    }
}

impl From<JobtechError> for jobswipe_core::Error {
    fn from(err: JobtechError) -> Self {
        match err {
            JobtechError::NotFound(id) => jobswipe_core::Error::JobNotFound(id),
            other => jobswipe_core::Error::Upstream(other.to_string()),
        }
    }
}
