//! Per-unit synchronization pipeline.
//!
//! The orchestrator drives every pending unit through
//! `Fetching → Replacing → Advancing → Done`, with `Failed(reason)` reachable
//! from each of the first three states. Units run strictly one after another.

pub mod advancer;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod replacer;


pub use advancer::StatusAdvancer;
pub use error::{PipelineError, StoreError};
pub use pipeline::{RunSummary, SyncPipeline, UnitState};
pub use ports::{FetchOutcome, ItemSource, UnitStore};
pub use replacer::{ReplaceOutcome, StoreReplacer};
