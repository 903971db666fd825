//! Local persistence and database migrations.
//!
//! The sync bot remembers which pull request patches it has already turned
//! into Gerrit changes. The mapping lives in a local `SQLite` database whose
//! schema is managed with Diesel migrations, so the table is created on first
//! use and upgraded consistently across machines.

mod error;
mod migrator;
mod patch_store;

pub use error::PersistenceError;
pub use migrator::{INITIAL_SCHEMA_VERSION, SchemaVersion, migrate_database};
pub use patch_store::{TrackedPatch, TrackedPatchStore};
