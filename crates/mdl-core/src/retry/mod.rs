//! Retry and backoff policy.
//!
//! Encapsulates the per-task retry budget and the linear backoff rule so the
//! worker loop and the CLI share one definition of "how many attempts and
//! how long between them".

mod error;
mod policy;

pub use error::TransferError;
pub use policy::{RetryDecision, RetryPolicy};
