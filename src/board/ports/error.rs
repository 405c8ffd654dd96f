//! Error type shared by all remote ports.

use std::sync::Arc;
use thiserror::Error;

/// Result type for remote port operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors returned by remote port implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The remote answered with a non-success status.
    #[error("remote returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Preview of the response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode remote response: {0}")]
    Decode(String),

    /// The addressed record does not exist.
    #[error("remote record not found: {0}")]
    NotFound(String),

    /// The remote refused the operation.
    #[error("remote rejected request: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Wraps a transport-layer error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
