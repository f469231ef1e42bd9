//! Store start-up: connect, bring the schema to the latest version, or roll it back.

use crate::common::errors::AppError;
use crate::config::Config;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashSet;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

pub async fn connect(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(config.db_url.clone());
    options.sqlx_logging(false);
    // Every pooled connection to an in-memory SQLite URL would open its own database
    if config.db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    db.ping().await?;
    tracing::info!(deployment = %config.deployment, "Connected to the datatype store");
    Ok(db)
}

/// Applies every pending migration and returns how many ran.
pub async fn initialize(db: &DatabaseConnection) -> Result<usize, AppError> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    if pending == 0 {
        tracing::info!("Datatype store is up to date");
        return Ok(0);
    }

    Migrator::up(db, None).await?;
    tracing::info!(applied = pending, "DB migrations complete");
    Ok(pending)
}

/// Rolls back every applied migration, leaving an empty store.
pub async fn reset(db: &DatabaseConnection) -> Result<(), AppError> {
    let applied = Migrator::get_applied_migrations(db).await?.len();
    Migrator::reset(db).await?;
    tracing::warn!(rolled_back = applied, "Datatype store reset");
    Ok(())
}

pub async fn status(db: &DatabaseConnection) -> Result<Vec<MigrationState>, AppError> {
    let applied: HashSet<String> = Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    Ok(Migrator::migrations()
        .iter()
        .map(|m| MigrationState {
            name: m.name().to_string(),
            applied: applied.contains(m.name()),
        })
        .collect())
}
