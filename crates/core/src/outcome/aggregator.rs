//! Append-only failure log for one run.

use super::types::{FailureReason, RunStatus, UnitOutcome};

/// Failures recorded during a run, in unit processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeLog {
    failures: Vec<UnitOutcome>,
}

impl OutcomeLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records that `unit_id` ended in `Failed(reason)`.
    pub fn record_failure(&mut self, unit_id: impl Into<String>, reason: FailureReason) {
        self.failures.push(UnitOutcome {
            unit_id: unit_id.into(),
            reason,
        });
    }

    /// Returns the recorded failures in encounter order.
    #[must_use]
    pub fn failures(&self) -> &[UnitOutcome] {
        &self.failures
    }

    /// Returns the number of failed units.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Returns the reason recorded for a unit, if it failed.
    #[must_use]
    pub fn reason_for(&self, unit_id: &str) -> Option<FailureReason> {
        self.failures
            .iter()
            .find(|outcome| outcome.unit_id == unit_id)
            .map(|outcome| outcome.reason)
    }

    /// Classifies the run against the number of units processed.
    #[must_use]
    pub fn status(&self, total_units: usize) -> RunStatus {
        RunStatus::classify(self.failures.len(), total_units)
    }
}
