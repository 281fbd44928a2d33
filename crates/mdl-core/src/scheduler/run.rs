//! The dispatch/reap loop.
//!
//! Single owner of all run state: the FIFO queue, the set of active workers,
//! and the running report. Workers communicate only through their join
//! handles, so no locks are needed anywhere in the loop.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::control::CancelToken;
use crate::retry::RetryPolicy;
use crate::task::Task;
use crate::transfer::{TransferExecutor, TransferOptions};

use super::report::{RunReport, TaskResult};
use super::worker;

/// Runs `tasks` to completion under a hard concurrency cap.
///
/// Dispatch is strictly FIFO over the submitted order. A task whose
/// destination already exists while resume is off is recorded as skipped
/// without ever occupying a worker slot. At the cap, the loop awaits the
/// next completion (`JoinSet::join_next` is the reaper: it frees exactly one
/// slot, never blocks on a specific worker, and doubles as the drain loop
/// once the queue is empty). Cancellation stops dispatch; already-running
/// workers shut down cooperatively and are drained before returning.
pub async fn run_tasks(
    executor: Arc<dyn TransferExecutor>,
    tasks: Vec<Task>,
    cap: usize,
    policy: RetryPolicy,
    opts: TransferOptions,
    cancel: CancelToken,
) -> RunReport {
    let cap = cap.max(1);
    let mut queue: VecDeque<Task> = tasks.into();
    let mut active: JoinSet<TaskResult> = JoinSet::new();
    let mut report = RunReport::default();

    loop {
        while active.len() < cap && !cancel.is_cancelled() {
            let Some(task) = queue.pop_front() else { break };

            if task.dest.exists() && !opts.resume {
                tracing::info!(
                    task = task.id,
                    dest = %task.dest.display(),
                    "destination exists, skipping"
                );
                report.record(&TaskResult::skipped(task.id));
                continue;
            }

            tracing::debug!(task = task.id, url = %task.url, "dispatching");
            active.spawn(worker::run_task(
                Arc::clone(&executor),
                task,
                policy,
                opts.clone(),
                cancel.clone(),
            ));
        }

        let Some(joined) = active.join_next().await else {
            // No active workers and nothing dispatchable: done (or cancelled).
            break;
        };

        match joined {
            Ok(result) => report.record(&result),
            Err(e) => {
                // A panicked worker still consumed its slot; account for it
                // so completed + failed + skipped == total stays true.
                tracing::error!("worker task join: {}", e);
                report.failed += 1;
                report.total += 1;
            }
        }
    }

    if cancel.is_cancelled() {
        report.interrupted = true;
        if !queue.is_empty() {
            tracing::info!(remaining = queue.len(), "interrupted, tasks not dispatched");
        }
    }

    report
}
