//! Unified error types for jobswipe.
//!
//! The `Display` prefix of every variant is a stable machine-readable code
//! that the HTTP layer also uses when mapping to a status.

use tokio_rusqlite::rusqlite;

/// Unified error types for the jobswipe service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an unknown swipe direction).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The upstream API does not know the requested job.
    #[error("JOB_NOT_FOUND: {0}")]
    JobNotFound(String),

    /// The upstream API failed or could not be reached.
    #[error("UPSTREAM_UNAVAILABLE: {0}")]
    Upstream(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored JSON column could not be encoded or decoded.
    #[error("STORE_ERROR: serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    /// Stable error code, the part of the message before the colon.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::JobNotFound(_) => "JOB_NOT_FOUND",
            Error::Upstream(_) => "UPSTREAM_UNAVAILABLE",
            Error::Database(_) | Error::MigrationFailed(_) | Error::Serialization(_) => "STORE_ERROR",
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
