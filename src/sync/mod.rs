//! The sync run: every tracked repository, every open pull request, in order.

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::github::{ForgeGateway, RepositoryLocator};
use crate::persistence::TrackedPatchStore;
use crate::reconcile::{GerritTarget, ReconcileOutcome, Reconciler};
use crate::telemetry::TelemetrySink;
use crate::workspace::{GitOperations, WorkspaceManager, WorkspaceSettings};

/// Counts of pull request outcomes in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pull requests whose patch was unchanged.
    pub skipped: usize,
    /// Pull requests submitted as new changes.
    pub submitted: usize,
    /// Pull requests pushed as new patch sets.
    pub updated: usize,
}

impl RunSummary {
    const fn record(&mut self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Skipped => self.skipped += 1,
            ReconcileOutcome::Submitted { .. } => self.submitted += 1,
            ReconcileOutcome::Updated { .. } => self.updated += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} updated, {} unchanged",
            self.submitted, self.updated, self.skipped
        )
    }
}

/// Collaborators a [`SyncBot`] is assembled from.
pub struct SyncParts {
    /// GitHub client.
    pub forge: Arc<dyn ForgeGateway>,
    /// Git command runner shared by workspaces and the reconciler.
    pub git: Arc<dyn GitOperations>,
    /// Telemetry destination.
    pub telemetry: Arc<dyn TelemetrySink>,
}

/// Synchronises the configured repositories' pull requests into Gerrit.
pub struct SyncBot {
    owner: String,
    repos: Vec<String>,
    forge: Arc<dyn ForgeGateway>,
    git: Arc<dyn GitOperations>,
    telemetry: Arc<dyn TelemetrySink>,
    store: TrackedPatchStore,
    workspaces: WorkspaceManager,
    target: GerritTarget,
}

impl SyncBot {
    /// Builds a bot from the merged configuration.
    ///
    /// Opens (and migrates) the content store.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] when a required key is missing, or
    /// [`SyncError::Persistence`] when the store cannot be opened.
    pub fn from_config(config: &SyncConfig, parts: SyncParts) -> Result<Self, SyncError> {
        let owner = config.require_gh_account()?.to_owned();
        let settings = WorkspaceSettings::from_config(config)?;
        let store = TrackedPatchStore::open(config.database_path()?.as_str())?;
        let target = GerritTarget {
            remote: config.gerrit_remote.clone(),
            branch: config.default_branch.clone(),
            web_url: config.gerrit_url.clone(),
        };

        Ok(Self {
            owner,
            repos: config.repos.clone(),
            workspaces: WorkspaceManager::new(Arc::clone(&parts.git), settings),
            forge: parts.forge,
            git: parts.git,
            telemetry: parts.telemetry,
            store,
            target,
        })
    }

    /// Runs one synchronisation pass.
    ///
    /// All workspaces are prepared before any pull request is processed.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyncError`]; the remaining work of the run is
    /// abandoned.
    pub async fn run(&self) -> Result<RunSummary, SyncError> {
        if self.repos.is_empty() {
            tracing::warn!("no repositories configured; nothing to do");
        }

        let mut workspaces: Vec<(&str, Utf8PathBuf)> = Vec::with_capacity(self.repos.len());
        for repository in &self.repos {
            let path = self.workspaces.prepare(repository)?;
            workspaces.push((repository.as_str(), path));
        }

        let reconciler = Reconciler::new(
            self.forge.as_ref(),
            self.git.as_ref(),
            &self.store,
            &self.workspaces,
            self.telemetry.as_ref(),
            &self.target,
        );

        let mut summary = RunSummary::default();
        for (repository, path) in &workspaces {
            let locator = RepositoryLocator::from_owner_repo(&self.owner, repository)?;
            let pulls = self.forge.list_open_pull_requests(&locator).await?;
            tracing::info!(repository, open = pulls.len(), "listed open pull requests");

            for pull_request in &pulls {
                let outcome = reconciler.reconcile(repository, path, pull_request).await?;
                summary.record(&outcome);
            }
        }

        tracing::info!(%summary, "sync run complete");
        Ok(summary)
    }
}
