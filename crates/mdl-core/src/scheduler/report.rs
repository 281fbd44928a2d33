//! Terminal task results and run-level accounting.

/// Terminal outcome of one submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The transfer succeeded within the attempt budget.
    Completed,
    /// All allowed attempts failed (or the task was cancelled in flight).
    Failed,
    /// Destination already existed with resume off; never dispatched.
    Skipped,
}

/// One task's terminal record: produced exactly once by its worker (or by
/// the dispatcher for skips), consumed immediately by the aggregator, never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: u64,
    pub outcome: TaskOutcome,
    /// Attempts actually used; 0 for skipped tasks.
    pub attempts: u32,
}

impl TaskResult {
    pub fn completed(task_id: u64, attempts: u32) -> Self {
        Self {
            task_id,
            outcome: TaskOutcome::Completed,
            attempts,
        }
    }

    pub fn failed(task_id: u64, attempts: u32) -> Self {
        Self {
            task_id,
            outcome: TaskOutcome::Failed,
            attempts,
        }
    }

    pub fn skipped(task_id: u64) -> Self {
        Self {
            task_id,
            outcome: TaskOutcome::Skipped,
            attempts: 0,
        }
    }
}

/// Aggregate accounting for one run. Counts are only ever incremented, one
/// per recorded result, so `completed + failed + skipped == total` holds at
/// every point and the final values are independent of completion order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub total: u64,
    /// Set when the run was cut short by an external interrupt.
    pub interrupted: bool,
}

impl RunReport {
    pub fn record(&mut self, result: &TaskResult) {
        self.total += 1;
        match result.outcome {
            TaskOutcome::Completed => self.completed += 1,
            TaskOutcome::Failed => self.failed += 1,
            TaskOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Overall run success: nothing failed and the run was not interrupted.
    /// Skips are allowed.
    pub fn success(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_conserved() {
        let mut report = RunReport::default();
        report.record(&TaskResult::completed(1, 1));
        report.record(&TaskResult::failed(2, 4));
        report.record(&TaskResult::skipped(3));
        report.record(&TaskResult::completed(4, 2));
        assert_eq!(report.completed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.total, 4);
        assert_eq!(
            report.completed + report.failed + report.skipped,
            report.total
        );
    }

    #[test]
    fn success_requires_zero_failures() {
        let mut report = RunReport::default();
        report.record(&TaskResult::completed(1, 1));
        report.record(&TaskResult::skipped(2));
        assert!(report.success());
        report.record(&TaskResult::failed(3, 4));
        assert!(!report.success());
    }

    #[test]
    fn interrupt_fails_the_run() {
        let mut report = RunReport::default();
        report.record(&TaskResult::completed(1, 1));
        report.interrupted = true;
        assert!(!report.success());
    }
}
