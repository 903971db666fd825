//! Top-level error for a sync run.

use thiserror::Error;

use crate::config::ConfigError;
use crate::github::ForgeError;
use crate::persistence::PersistenceError;
use crate::wiki::WikiError;
use crate::workspace::WorkspaceError;

/// Any failure that aborts a sync run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The content store failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// GitHub could not be reached or rejected a request.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// The wiki configuration overlay could not be read.
    #[error(transparent)]
    Wiki(#[from] WikiError),

    /// A git command or workspace file operation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The commit created for a new submission carries no `Change-Id`.
    ///
    /// This happens when `git review -s` has not installed Gerrit's
    /// `commit-msg` hook in the workspace.
    #[error("commit for {patch_url} has no Change-Id trailer; is the commit-msg hook installed?")]
    MissingChangeId {
        /// Patch URL of the pull request being submitted.
        patch_url: String,
    },

    /// A blocking task could not be joined.
    #[error("background task failed: {message}")]
    Task {
        /// Join error detail.
        message: String,
    },
}
