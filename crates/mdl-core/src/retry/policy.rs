use std::time::Duration;

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Budget exhausted; the task is terminally failed.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff policy shared read-only by all workers.
///
/// `max_attempts` counts total attempts including the first; the user-facing
/// `--retries R` knob maps to `max_attempts = R + 1`, so `--retries 0` still
/// performs exactly one attempt. The wait before retry k+1 is `k * base_delay`
/// (attempt 1 fails ⇒ wait base, attempt 2 fails ⇒ wait 2 × base).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first); always ≥ 1.
    pub max_attempts: u32,
    /// Base delay for linear backoff.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from the user-facing retry count (extra attempts
    /// after the first).
    pub fn from_retries(retries: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: retries + 1,
            base_delay,
        }
    }

    /// Decides what to do after attempt number `attempt` (1-based) failed.
    /// Never schedules a delay after the final allowed attempt.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(attempt))
    }
}
