//! Git operations used by the workspace manager and the reconciler.
//!
//! Every operation takes the working directory it acts on explicitly; nothing
//! depends on the process's current directory. The trait allows tests to
//! substitute a mock for the subprocess-backed implementation.

mod system;

use camino::Utf8Path;

use super::error::WorkspaceError;

pub use system::SystemGit;

/// Git commands the sync bot issues against a workspace.
#[cfg_attr(test, mockall::automock)]
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the clone fails.
    fn clone_repository(&self, url: &str, target: &Utf8Path) -> Result<(), WorkspaceError>;

    /// Checks out `revision`, detaching `HEAD` when it names a remote branch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the checkout fails.
    fn checkout(&self, repo: &Utf8Path, revision: &str) -> Result<(), WorkspaceError>;

    /// Discards staged and unstaged changes to tracked files.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the reset fails.
    fn reset_hard(&self, repo: &Utf8Path) -> Result<(), WorkspaceError>;

    /// Fetches `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the fetch fails.
    fn fetch(&self, repo: &Utf8Path, remote: &str) -> Result<(), WorkspaceError>;

    /// Sets a repository-local configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when `git config` fails.
    fn set_config(&self, repo: &Utf8Path, key: &str, value: &str) -> Result<(), WorkspaceError>;

    /// Registers the workspace with Gerrit (`git review -s`), installing the
    /// remote and the hook that mints `Change-Id` trailers.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when `git review` fails.
    fn review_setup(&self, repo: &Utf8Path) -> Result<(), WorkspaceError>;

    /// Applies a mailbox patch series and returns how many commits it created.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when `git am` fails or applies nothing.
    fn apply_mailbox(&self, repo: &Utf8Path, patch: &Utf8Path) -> Result<usize, WorkspaceError>;

    /// Moves `HEAD` back by `count` commits, keeping their changes staged.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the reset fails.
    fn soft_reset(&self, repo: &Utf8Path, count: usize) -> Result<(), WorkspaceError>;

    /// Commits everything staged with `message` and the given author.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the commit fails.
    fn commit(&self, repo: &Utf8Path, message: &str, author: &str)
    -> Result<(), WorkspaceError>;

    /// Pushes `refspec` to `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the push fails.
    fn push(&self, repo: &Utf8Path, remote: &str, refspec: &str) -> Result<(), WorkspaceError>;

    /// Returns the full message of the `HEAD` commit.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Git`] when the repository or commit cannot be
    /// read.
    fn head_message(&self, repo: &Utf8Path) -> Result<String, WorkspaceError>;

    /// Returns whether `path` holds a git repository.
    fn is_repository(&self, path: &Utf8Path) -> bool;
}
