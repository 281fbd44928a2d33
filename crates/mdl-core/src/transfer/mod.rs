//! Transfer executor: performs one attempt of one task's data movement.
//!
//! The scheduler and workers only see the `TransferExecutor` trait; the curl
//! backend lives behind it so tests can substitute a scripted executor.

mod curl_backend;

pub use curl_backend::CurlExecutor;

use std::path::Path;
use std::time::Duration;

use crate::control::CancelToken;
use crate::retry::TransferError;

/// Pass-through parameters for one attempt. The scheduler never interprets
/// these; they go to the backend verbatim.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Continue a partial transfer instead of starting over.
    pub resume: bool,
    /// Per-attempt wall-clock timeout (None = no limit).
    pub timeout: Option<Duration>,
    /// Download rate cap as given by the user (e.g. "500k", "2m").
    pub rate_limit: Option<String>,
}

/// One blocking attempt at moving `url` to `dest`. Implementations must
/// honor `cancel` promptly (it is the run-wide interrupt) and must not leave
/// a partially written `dest` on failure; partial data belongs in a side
/// file so the destination only appears on success.
pub trait TransferExecutor: Send + Sync + 'static {
    fn transfer(
        &self,
        url: &str,
        dest: &Path,
        opts: &TransferOptions,
        cancel: &CancelToken,
    ) -> Result<(), TransferError>;
}
