//! Errors raised while preparing or mutating a workspace.

use thiserror::Error;

/// Failures of the local git workspace.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    /// A git command exited unsuccessfully.
    #[error("`{command}` failed ({status}):\n{stderr}{stdout}")]
    CommandFailed {
        /// Command line as executed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The command could not be started.
    #[error("failed to run `{command}`: {message}")]
    Spawn {
        /// Command line that could not start.
        command: String,
        /// Operating system error detail.
        message: String,
    },

    /// Reading the repository through libgit2 failed.
    #[error("git error: {message}")]
    Git {
        /// Error detail from the git2 library.
        message: String,
    },

    /// Writing a file inside the repository root failed.
    #[error("failed to write {path}: {message}")]
    Io {
        /// Path that was written.
        path: String,
        /// I/O error detail.
        message: String,
    },

    /// A refresh was requested for a workspace that was never cloned.
    #[error("workspace {path} has not been cloned")]
    NotCloned {
        /// Expected workspace path.
        path: String,
    },

    /// `git am` succeeded but reported no applied commits.
    #[error("patch {path} applied no commits")]
    NothingApplied {
        /// Patch file passed to `git am`.
        path: String,
    },
}

impl From<git2::Error> for WorkspaceError {
    fn from(error: git2::Error) -> Self {
        Self::Git {
            message: error.message().to_owned(),
        }
    }
}
