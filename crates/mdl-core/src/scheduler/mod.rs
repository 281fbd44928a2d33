//! Bounded-concurrency task scheduler.
//!
//! Coordinates the run: FIFO dispatch under a hard cap, per-task workers
//! with linear-backoff retry, event-driven completion reaping, and
//! order-independent aggregate accounting.

mod report;
mod run;
mod worker;

pub use report::{RunReport, TaskOutcome, TaskResult};
pub use run::run_tasks;
