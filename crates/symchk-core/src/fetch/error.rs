//! Fetch error type for retry classification and variant fallback.

use thiserror::Error;

/// Error returned by a single GET against a mirror.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP error {0}")]
    Http(u32),
    /// Writing the artifact to disk failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl FetchError {
    /// Status code for HTTP-level failures.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            _ => None,
        }
    }
}
