//! Database migration operations.

use gerrit_sync::persistence::migrate_database;
use gerrit_sync::{SyncConfig, SyncError};

use super::telemetry_sink;

/// Runs database migrations against the configured `db_location`.
///
/// # Errors
///
/// Returns [`SyncError::Config`] if `db_location` is missing, or
/// [`SyncError::Persistence`] for blank locations, connection or migration
/// failures.
pub fn run(config: &SyncConfig) -> Result<(), SyncError> {
    let database_path = config.database_path()?;

    let telemetry = telemetry_sink(config);
    let schema_version = migrate_database(database_path.as_str(), telemetry.as_ref())?;

    tracing::info!(
        database = %database_path,
        schema_version = schema_version.as_str(),
        "database migrated"
    );
    Ok(())
}
