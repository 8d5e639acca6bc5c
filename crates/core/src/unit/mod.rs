//! Execution units: the budget entities processed one at a time by a run.

pub mod error;
pub mod types;

pub use error::DescriptorError;
pub use types::{ExecutionUnit, ServiceDescriptor};
