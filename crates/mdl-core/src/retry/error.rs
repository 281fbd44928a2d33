//! Per-attempt transfer error type.

use thiserror::Error;

/// Error from one attempt of one task's transfer. Drives the worker's retry
/// loop; `Interrupted` is terminal and never retried.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection reset, DNS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Local file error (open, rename, disk full).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// The run was cancelled while this attempt was in flight.
    #[error("transfer interrupted")]
    Interrupted,
}

impl TransferError {
    /// Whether the retry policy may schedule another attempt for this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransferError::Interrupted)
    }
}
