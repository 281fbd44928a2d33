//! Per-task worker: owns one task's attempt/retry lifecycle.
//!
//! A worker runs independently of the dispatch loop, calls the transfer
//! executor under `spawn_blocking` (the backend is blocking I/O), sleeps the
//! linear backoff between attempts, and reports exactly one terminal
//! `TaskResult`. It never touches scheduler state.

use std::sync::Arc;

use crate::control::CancelToken;
use crate::retry::{RetryDecision, RetryPolicy, TransferError};
use crate::task::Task;
use crate::transfer::{TransferExecutor, TransferOptions};

use super::report::TaskResult;

pub(super) async fn run_task(
    executor: Arc<dyn TransferExecutor>,
    task: Task,
    policy: RetryPolicy,
    opts: TransferOptions,
    cancel: CancelToken,
) -> TaskResult {
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            // Dispatched but cut off before this attempt started.
            return TaskResult::failed(task.id, attempt.saturating_sub(1));
        }

        let outcome = {
            let executor = Arc::clone(&executor);
            let task = task.clone();
            let opts = opts.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || {
                executor.transfer(&task.url, &task.dest, &opts, &cancel)
            })
            .await
        };

        let err = match outcome {
            Ok(Ok(())) => {
                tracing::info!(task = task.id, url = %task.url, attempt, "completed");
                return TaskResult::completed(task.id, attempt);
            }
            Ok(Err(e)) => e,
            Err(join_err) => {
                tracing::error!(task = task.id, "worker panicked: {}", join_err);
                return TaskResult::failed(task.id, attempt);
            }
        };

        if matches!(err, TransferError::Interrupted) {
            tracing::info!(task = task.id, attempt, "interrupted");
            return TaskResult::failed(task.id, attempt);
        }

        match policy.decide(attempt) {
            RetryDecision::NoRetry => {
                tracing::warn!(
                    task = task.id,
                    url = %task.url,
                    attempts = attempt,
                    "failed permanently: {}",
                    err
                );
                return TaskResult::failed(task.id, attempt);
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    task = task.id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying: {}",
                    err
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {
                        return TaskResult::failed(task.id, attempt);
                    }
                }
                attempt += 1;
            }
        }
    }
}
