//! Local git workspaces, one per tracked repository.
//!
//! A workspace is either [`WorkspaceState::Uninitialized`] (nothing cloned
//! yet) or [`WorkspaceState::Ready`]. Preparing an uninitialized workspace
//! clones it, checks out the upstream branch and registers it with Gerrit;
//! preparing a ready one discards local changes and fast-forwards it to the
//! upstream branch. The state is derived from disk on every call.

mod error;
pub mod git_ops;

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::{ConfigError, SyncConfig, clone_url};
use crate::types::PatchUrl;

pub use error::WorkspaceError;
pub use git_ops::{GitOperations, SystemGit};

#[cfg(test)]
pub use git_ops::MockGitOperations;

const UPSTREAM_REMOTE: &str = "origin";
const PATCH_DIR: &str = ".patches";

/// Lifecycle of a workspace directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    /// No clone exists at the expected path.
    Uninitialized,
    /// A clone exists and can be refreshed.
    Ready,
}

/// Settings shared by every workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    /// Directory holding one clone per repository.
    pub root: Utf8PathBuf,
    /// Clone URL template containing `$1`.
    pub clone_template: String,
    /// Gerrit account recorded as `gitreview.username`.
    pub gerrit_username: String,
    /// Upstream branch checked out before processing.
    pub default_branch: String,
}

impl WorkspaceSettings {
    /// Extracts workspace settings from the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required key is missing or the clone
    /// template lacks its placeholder.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root: config.repo_root()?,
            clone_template: config.require_clone_template()?.to_owned(),
            gerrit_username: config.require_gerrit_username()?.to_owned(),
            default_branch: config.default_branch.clone(),
        })
    }
}

/// Prepares workspaces and stores downloaded patches next to them.
pub struct WorkspaceManager {
    git: Arc<dyn GitOperations>,
    settings: WorkspaceSettings,
}

impl WorkspaceManager {
    /// Creates a manager issuing commands through `git`.
    #[must_use]
    pub fn new(git: Arc<dyn GitOperations>, settings: WorkspaceSettings) -> Self {
        Self { git, settings }
    }

    /// Path of the clone for `name`.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.settings.root.join(name)
    }

    /// Reports whether `name` has been cloned.
    #[must_use]
    pub fn state(&self, name: &str) -> WorkspaceState {
        if self.git.is_repository(&self.path(name)) {
            WorkspaceState::Ready
        } else {
            WorkspaceState::Uninitialized
        }
    }

    fn upstream_branch(&self) -> String {
        format!("{UPSTREAM_REMOTE}/{}", self.settings.default_branch)
    }

    /// Brings the workspace for `name` to a clean upstream state, cloning it
    /// first when needed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the root cannot be created or a git
    /// command fails.
    pub fn prepare(&self, name: &str) -> Result<Utf8PathBuf, WorkspaceError> {
        create_dir_all(&self.settings.root)?;
        match self.state(name) {
            WorkspaceState::Uninitialized => self.ensure_repo(name),
            WorkspaceState::Ready => self.refresh_repo(name),
        }
    }

    /// Clones and registers the workspace if it does not exist yet.
    ///
    /// An existing clone is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when cloning, checking out, or `git review`
    /// fails.
    pub fn ensure_repo(&self, name: &str) -> Result<Utf8PathBuf, WorkspaceError> {
        let path = self.path(name);
        if self.state(name) == WorkspaceState::Ready {
            return Ok(path);
        }

        let url = clone_url(&self.settings.clone_template, name);
        tracing::info!(repository = name, %url, %path, "cloning workspace");
        self.git.clone_repository(&url, &path)?;
        self.git.checkout(&path, &self.upstream_branch())?;
        self.git
            .set_config(&path, "gitreview.username", &self.settings.gerrit_username)?;
        self.git.review_setup(&path)?;
        Ok(path)
    }

    /// Discards local changes and moves the workspace to the upstream tip.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotCloned`] for an uninitialized workspace,
    /// or the failing git command's error.
    pub fn refresh_repo(&self, name: &str) -> Result<Utf8PathBuf, WorkspaceError> {
        let path = self.path(name);
        if self.state(name) == WorkspaceState::Uninitialized {
            return Err(WorkspaceError::NotCloned {
                path: path.to_string(),
            });
        }

        tracing::info!(repository = name, %path, "refreshing workspace");
        self.git.reset_hard(&path)?;
        self.git.fetch(&path, UPSTREAM_REMOTE)?;
        self.git.checkout(&path, &self.upstream_branch())?;
        Ok(path)
    }

    /// Local file a pull request's patch is downloaded to.
    ///
    /// Patches live under the workspace root but outside every clone, so a
    /// hard reset never touches them.
    #[must_use]
    pub fn patch_path(&self, name: &str, patch_url: &PatchUrl) -> Utf8PathBuf {
        self.settings
            .root
            .join(PATCH_DIR)
            .join(name)
            .join(patch_url.file_name())
    }

    /// Writes patch content to [`Self::patch_path`], replacing a stale copy.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Io`] when the file cannot be written.
    pub fn write_patch(
        &self,
        name: &str,
        patch_url: &PatchUrl,
        content: &str,
    ) -> Result<Utf8PathBuf, WorkspaceError> {
        let path = self.patch_path(name, patch_url);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        if path.exists() {
            tracing::debug!(%path, "removing stale patch");
        }
        fs::write(&path, content).map_err(|error| WorkspaceError::Io {
            path: path.to_string(),
            message: error.to_string(),
        })?;
        Ok(path)
    }
}

fn create_dir_all(path: &Utf8Path) -> Result<(), WorkspaceError> {
    fs::create_dir_all(path).map_err(|error| WorkspaceError::Io {
        path: path.to_string(),
        message: error.to_string(),
    })
}
