//! Tracked patch records backed by `SQLite`.
//!
//! Each row maps a pull request's patch URL to the Gerrit change created for
//! it, the repository it came from, and the digest of the patch content that
//! was last pushed. The reconciliation engine reads a row on every encounter
//! of a pull request, inserts one on first submission, and refreshes the
//! digest when it pushes a new patch set.

use std::sync::{Mutex, MutexGuard};

use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;

use crate::types::{ChangeId, ContentHash, PatchUrl};

use super::PersistenceError;
use super::migrator::{establish, run_pending};

const PULL_REQUESTS_TABLE: &str = "pull_requests";

/// A persisted `(url, changeid, repo, hash)` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPatch {
    /// Patch URL, the primary key.
    pub patch_url: PatchUrl,
    /// Gerrit Change-Id assigned on first submission.
    pub change_id: ChangeId,
    /// Repository the pull request belongs to.
    pub repository: String,
    /// Digest of the patch content at last successful processing.
    pub content_hash: ContentHash,
}

/// SQLite-backed store of tracked pull request patches.
pub struct TrackedPatchStore {
    connection: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for TrackedPatchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedPatchStore")
            .field("connection", &"<SqliteConnection>")
            .finish()
    }
}

impl TrackedPatchStore {
    /// Opens the database at `database_url`, creating the `pull_requests`
    /// table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BlankDatabaseUrl`] for a blank location, or
    /// a connection/migration error when the database cannot be prepared.
    pub fn open(database_url: &str) -> Result<Self, PersistenceError> {
        let mut connection = establish(database_url)?;
        run_pending(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens a database without running migrations.
    #[cfg(test)]
    pub(crate) fn open_existing(database_url: &str) -> Result<Self, PersistenceError> {
        let connection = establish(database_url)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Looks up the record for `patch_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the schema is missing or the query
    /// fails.
    pub fn find(&self, patch_url: &PatchUrl) -> Result<Option<TrackedPatch>, PersistenceError> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = Text)]
            changeid: String,
            #[diesel(sql_type = Text)]
            repo: String,
            #[diesel(sql_type = Text)]
            hash: String,
        }

        let mut connection = self.lock()?;

        let result: Option<Row> = sql_query(
            "SELECT changeid, repo, hash FROM pull_requests WHERE url = ? LIMIT 1;",
        )
        .bind::<Text, _>(patch_url.as_str())
        .get_result(&mut *connection)
        .optional()
        .map_err(|error| Self::map_query_error(&mut connection, &error))?;

        Ok(result.map(|row| TrackedPatch {
            patch_url: patch_url.clone(),
            change_id: ChangeId::new(row.changeid),
            repository: row.repo,
            content_hash: ContentHash::from_hex(row.hash),
        }))
    }

    /// Records a newly submitted pull request.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateRecord`] when `patch_url` is
    /// already tracked; inserts happen only on first submission, so this
    /// signals a caller bug.
    pub fn insert(&self, record: &TrackedPatch) -> Result<(), PersistenceError> {
        let mut connection = self.lock()?;

        sql_query("INSERT INTO pull_requests (url, changeid, repo, hash) VALUES (?, ?, ?, ?);")
            .bind::<Text, _>(record.patch_url.as_str())
            .bind::<Text, _>(record.change_id.as_str())
            .bind::<Text, _>(record.repository.as_str())
            .bind::<Text, _>(record.content_hash.as_str())
            .execute(&mut *connection)
            .map(drop)
            .map_err(|error| match error {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PersistenceError::DuplicateRecord {
                        patch_url: record.patch_url.to_string(),
                    }
                }
                other => Self::map_write_error(&mut connection, &other),
            })
    }

    /// Replaces the stored digest after a new patch set was pushed.
    ///
    /// The Change-Id and repository of the record are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::RecordNotFound`] when no row matches
    /// `patch_url`.
    pub fn update_hash(
        &self,
        patch_url: &PatchUrl,
        content_hash: &ContentHash,
    ) -> Result<(), PersistenceError> {
        let mut connection = self.lock()?;

        let affected = sql_query("UPDATE pull_requests SET hash = ? WHERE url = ?;")
            .bind::<Text, _>(content_hash.as_str())
            .bind::<Text, _>(patch_url.as_str())
            .execute(&mut *connection)
            .map_err(|error| Self::map_write_error(&mut connection, &error))?;

        if affected == 0 {
            return Err(PersistenceError::RecordNotFound {
                patch_url: patch_url.to_string(),
            });
        }

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteConnection>, PersistenceError> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::ConnectionFailed {
                message: "store connection mutex poisoned".to_owned(),
            })
    }

    fn table_exists(connection: &mut SqliteConnection) -> Result<bool, DieselError> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = BigInt)]
            one: i64,
        }

        let exists: Option<Row> = sql_query(
            "SELECT 1 AS one FROM sqlite_master WHERE type = 'table' AND name = ? LIMIT 1;",
        )
        .bind::<Text, _>(PULL_REQUESTS_TABLE)
        .get_result(connection)
        .optional()?;

        Ok(exists.is_some_and(|row| row.one == 1))
    }

    fn map_error_with_schema_check<F>(
        connection: &mut SqliteConnection,
        error: &DieselError,
        create_error: F,
    ) -> PersistenceError
    where
        F: Fn(String) -> PersistenceError,
    {
        match Self::table_exists(connection) {
            Ok(false) => PersistenceError::SchemaNotInitialised,
            Ok(true) => create_error(error.to_string()),
            Err(check_error) => create_error(format!(
                "schema presence check failed: {check_error}; original error: {error}"
            )),
        }
    }

    fn map_query_error(connection: &mut SqliteConnection, error: &DieselError) -> PersistenceError {
        Self::map_error_with_schema_check(connection, error, |message| {
            PersistenceError::QueryFailed { message }
        })
    }

    fn map_write_error(connection: &mut SqliteConnection, error: &DieselError) -> PersistenceError {
        Self::map_error_with_schema_check(connection, error, |message| {
            PersistenceError::WriteFailed { message }
        })
    }
}
