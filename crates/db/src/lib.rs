//! PostgreSQL store for execution units and expense items.
//!
//! This crate provides:
//! - [`ExecutionUnitRepository`], the [`UnitStore`](itemsync_core::UnitStore) implementation
//! - `COPY` based bulk loading of expense items
//! - Database migrations for the reference schema

pub mod bulk;
pub mod migration;
pub mod repositories;

pub use repositories::ExecutionUnitRepository;

use itemsync_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
