//! Repository abstractions for data access.
//!
//! Repositories hide the `SeaORM` and `sqlx` details behind the store port
//! defined in `itemsync-core`.

pub mod execution_unit;

pub use execution_unit::ExecutionUnitRepository;
