//! Outcome data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a unit did not reach `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The service answered with no items.
    NoRecords,
    /// Every fetch attempt failed.
    FetchFailed,
    /// Removing the previously stored items failed.
    DeleteFailed,
    /// Bulk loading the fetched items failed.
    InsertFailed,
    /// Marking the unit processed failed.
    AdvanceFailed,
}

impl FailureReason {
    /// Returns the report text for this reason.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoRecords => "the execution unit has no records for the configured year",
            Self::FetchFailed => {
                "could not retrieve the items of the execution unit from the remote service"
            }
            Self::DeleteFailed => {
                "could not remove the previously stored items for the execution unit"
            }
            Self::InsertFailed => "could not register the items of the execution unit",
            Self::AdvanceFailed => {
                "could not update the execution unit status, it must be processed again"
            }
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A failed unit and its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOutcome {
    /// Unit code.
    pub unit_id: String,
    /// Failure reason.
    pub reason: FailureReason,
}

/// Overall classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No unit failed (including a run with no pending units).
    AllSucceeded,
    /// Every unit failed.
    AllFailed,
    /// Some units failed.
    PartialSuccess,
}

impl RunStatus {
    /// Classifies a run from its failure count and total unit count.
    #[must_use]
    pub const fn classify(failures: usize, total_units: usize) -> Self {
        if failures == 0 {
            Self::AllSucceeded
        } else if failures == total_units {
            Self::AllFailed
        } else {
            Self::PartialSuccess
        }
    }

    /// Returns the summary sentence shown at the top of the report.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::AllSucceeded => {
                "The expense items of the execution units were registered successfully"
            }
            Self::AllFailed => {
                "No expense items were processed, please review the configured ETL process"
            }
            Self::PartialSuccess => {
                "The expense items were partially processed, with the following observations:"
            }
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AllSucceeded => "all_succeeded",
            Self::AllFailed => "all_failed",
            Self::PartialSuccess => "partial_success",
        };
        f.write_str(label)
    }
}
