//! Test utilities for database integration tests
//!
//! Shared helpers for setting up an in-memory SQLite database with the
//! full schema applied, used by the feature crates in their tests.

use crate::DbConnection;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use touchpoint_migrations::Migrator;

/// Connect to a fresh in-memory SQLite database and apply all migrations.
///
/// Every call returns an isolated database; nothing is shared between tests.
pub async fn setup_test_db() -> anyhow::Result<Arc<DbConnection>> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // A second pooled connection would see its own empty in-memory database
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    Ok(Arc::new(db))
}
