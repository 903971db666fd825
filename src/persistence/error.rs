//! Error types for the content store.

use thiserror::Error;

/// Errors returned while opening, migrating, or querying the `SQLite` store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database location was present but blank.
    #[error("database location must not be blank")]
    BlankDatabaseUrl,

    /// Establishing a `SQLite` connection failed.
    #[error("failed to connect to SQLite database: {message}")]
    ConnectionFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// Running pending migrations failed.
    #[error("failed to run database migrations: {message}")]
    MigrationFailed {
        /// Error detail from Diesel migrations.
        message: String,
    },

    /// Reading the schema version from the migration table failed.
    #[error("failed to read schema version after migrations: {message}")]
    SchemaVersionQueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// The migrations completed but no schema version could be found.
    #[error("no schema version recorded after migrations ran")]
    MissingSchemaVersion,

    /// The `pull_requests` table is missing.
    #[error("pull request store schema is not initialised; run with --migrate-db")]
    SchemaNotInitialised,

    /// A record for the patch URL already exists.
    #[error("patch {patch_url} is already tracked")]
    DuplicateRecord {
        /// Primary key that collided.
        patch_url: String,
    },

    /// An update targeted a patch URL with no record.
    #[error("patch {patch_url} is not tracked")]
    RecordNotFound {
        /// Primary key that matched no row.
        patch_url: String,
    },

    /// A lookup failed.
    #[error("store query failed: {message}")]
    QueryFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// An insert or update failed.
    #[error("store write failed: {message}")]
    WriteFailed {
        /// Error detail from Diesel.
        message: String,
    },
}
