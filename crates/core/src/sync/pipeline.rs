//! Orchestrator driving every pending unit through the sync steps.

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::advancer::StatusAdvancer;
use super::error::PipelineError;
use super::ports::{FetchOutcome, ItemSource, UnitStore};
use super::replacer::{ReplaceOutcome, StoreReplacer};
use crate::item::ExpenseItem;
use crate::outcome::{FailureReason, OutcomeLog, RunStatus};
use crate::report::{ReportDocument, ReportNotifier};
use crate::unit::ExecutionUnit;

/// State of one unit inside a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    /// Calling the remote service.
    Fetching,
    /// Replacing stored items with the fetched ones.
    Replacing(Vec<ExpenseItem>),
    /// Marking the unit processed.
    Advancing,
    /// Every step succeeded.
    Done,
    /// A step failed; the remaining steps were skipped.
    Failed(FailureReason),
}

impl UnitState {
    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier of the run, as recorded on the `sync_run` span.
    pub run_id: Uuid,
    /// Units listed as pending.
    pub total_units: usize,
    /// Failures in processing order.
    pub outcomes: OutcomeLog,
    /// Overall classification.
    pub status: RunStatus,
    /// Whether the report reached the transport.
    pub report_delivered: bool,
}

impl RunSummary {
    /// Returns the number of units that reached `Done`.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.total_units - self.outcomes.failure_count()
    }
}

/// Runs the sync over all pending units and reports the outcome.
///
/// Collaborators are built once by the caller and borrowed for the run.
pub struct SyncPipeline<'a> {
    source: &'a dyn ItemSource,
    store: &'a dyn UnitStore,
    notifier: ReportNotifier<'a>,
}

impl<'a> SyncPipeline<'a> {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        source: &'a dyn ItemSource,
        store: &'a dyn UnitStore,
        notifier: ReportNotifier<'a>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
        }
    }

    /// Executes one run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PendingUnits`] if the pending units cannot be
    /// listed. Nothing is processed and no report is sent in that case.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::now_v7();
        self.run_units(run_id)
            .instrument(info_span!("sync_run", %run_id))
            .await
    }

    async fn run_units(&self, run_id: Uuid) -> Result<RunSummary, PipelineError> {
        let units = self
            .store
            .list_pending_units()
            .await
            .map_err(PipelineError::PendingUnits)?;
        info!(units = units.len(), "Starting expense item load");

        let mut outcomes = OutcomeLog::new();
        for unit in &units {
            if let UnitState::Failed(reason) = self.process_unit(unit).await {
                warn!(unit_id = %unit.unit_id, year = unit.year, %reason, "Unit failed");
                outcomes.record_failure(unit.unit_id.clone(), reason);
            }
        }

        let report = ReportDocument::from_outcomes(&outcomes, units.len());
        info!(
            status = %report.status,
            total = units.len(),
            failed = outcomes.failure_count(),
            "Expense item load finished"
        );
        let report_delivered = self.notifier.notify(&report).await;

        Ok(RunSummary {
            run_id,
            total_units: units.len(),
            status: report.status,
            outcomes,
            report_delivered,
        })
    }

    /// Drives one unit to a terminal state.
    pub async fn process_unit(&self, unit: &ExecutionUnit) -> UnitState {
        let mut state = UnitState::Fetching;
        while !state.is_terminal() {
            state = self.step(unit, state).await;
        }
        state
    }

    async fn step(&self, unit: &ExecutionUnit, state: UnitState) -> UnitState {
        match state {
            UnitState::Fetching => {
                match self.source.fetch_items(unit).await {
                    FetchOutcome::Exhausted { attempts, last_error } => {
                        warn!(unit_id = %unit.unit_id, attempts, error = %last_error, "Fetch exhausted");
                        UnitState::Failed(FailureReason::FetchFailed)
                    }
                    FetchOutcome::Fetched { items, .. } => {
                        info!(unit_id = %unit.unit_id, items = items.len(), "Items fetched");
                        if items.is_empty() {
                            UnitState::Failed(FailureReason::NoRecords)
                        } else {
                            UnitState::Replacing(items)
                        }
                    }
                }
            }
            UnitState::Replacing(items) => {
                match StoreReplacer::new(self.store).replace(unit, &items).await {
                    ReplaceOutcome::Replaced { .. } => UnitState::Advancing,
                    ReplaceOutcome::DeleteFailed(_) => {
                        UnitState::Failed(FailureReason::DeleteFailed)
                    }
                    ReplaceOutcome::InsertFailed(_) => {
                        UnitState::Failed(FailureReason::InsertFailed)
                    }
                }
            }
            UnitState::Advancing => match StatusAdvancer::new(self.store).advance(unit).await {
                Ok(()) => UnitState::Done,
                Err(_) => UnitState::Failed(FailureReason::AdvanceFailed),
            },
            terminal @ (UnitState::Done | UnitState::Failed(_)) => terminal,
        }
    }
}
