//! Core synchronization logic for itemsync.
//!
//! This crate contains the per-unit pipeline with ZERO web or database
//! dependencies. Remote access and persistence are reached through the
//! ports in [`sync`].
//!
//! # Modules
//!
//! - `unit` - Execution units and their remote-call descriptors
//! - `item` - Expense item records
//! - `outcome` - Per-unit failure aggregation and run classification
//! - `report` - Report rendering and delivery
//! - `sync` - Ports, store replacement, status advancement and the orchestrator

pub mod item;
pub mod outcome;
pub mod report;
pub mod sync;
pub mod unit;

pub use item::ExpenseItem;
pub use outcome::{FailureReason, OutcomeLog, RunStatus, UnitOutcome};
pub use report::{ReportDocument, ReportNotifier, ReportSender};
pub use sync::{
    FetchOutcome, ItemSource, PipelineError, ReplaceOutcome, RunSummary, StatusAdvancer,
    StoreError, StoreReplacer, SyncPipeline, UnitStore,
};
pub use unit::{DescriptorError, ExecutionUnit, ServiceDescriptor};
