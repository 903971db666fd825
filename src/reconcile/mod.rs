//! Turns one open pull request into a Gerrit change.
//!
//! For every pull request the patch is downloaded and hashed, then compared
//! with the content store:
//!
//! - unknown patch URL: apply, squash, commit, record the minted Change-Id
//!   with a pending digest, push, record the digest, comment;
//! - known URL, same digest: nothing happens;
//! - known URL, new digest: apply, squash, commit with the stored Change-Id,
//!   push, record the new digest, comment.
//!
//! A failure at any step aborts the pull request. The workspace is left as
//! is; the next run's refresh resets it. The digest is only recorded once the
//! push succeeded, so a pull request whose push failed is retried as an
//! update of the already minted Change-Id.

pub mod decision;
pub mod message;
pub mod trailers;

use camino::Utf8Path;

use crate::error::SyncError;
use crate::github::{ForgeGateway, PullRequest};
use crate::persistence::{TrackedPatch, TrackedPatchStore};
use crate::telemetry::{TelemetryEvent, TelemetrySink};
use crate::types::{ChangeId, ContentHash};
use crate::workspace::{GitOperations, WorkspaceManager};

pub use decision::{ReconcileDecision, decide};

/// Result of reconciling one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The patch was already pushed with identical content.
    Skipped,
    /// A new Gerrit change was created.
    Submitted {
        /// Change-Id minted for the new change.
        change_id: ChangeId,
    },
    /// A new patch set was pushed to an existing change.
    Updated {
        /// Change-Id of the updated change.
        change_id: ChangeId,
    },
}

impl ReconcileOutcome {
    /// Short lowercase label for logs and telemetry.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Submitted { .. } => "submitted",
            Self::Updated { .. } => "updated",
        }
    }

    /// Change-Id involved, absent for skipped pull requests.
    #[must_use]
    pub const fn change_id(&self) -> Option<&ChangeId> {
        match self {
            Self::Skipped => None,
            Self::Submitted { change_id } | Self::Updated { change_id } => Some(change_id),
        }
    }
}

/// Where reviewed changes are pushed and linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GerritTarget {
    /// Git remote pointing at Gerrit.
    pub remote: String,
    /// Branch changes are proposed against.
    pub branch: String,
    /// Web UI base URL used to link the change in the comment.
    pub web_url: Option<String>,
}

impl GerritTarget {
    fn refspec(&self) -> String {
        format!("HEAD:refs/for/{}", self.branch)
    }

    fn comment(&self, outcome: &ReconcileOutcome) -> Option<String> {
        let (lead, change_id) = match outcome {
            ReconcileOutcome::Skipped => return None,
            ReconcileOutcome::Submitted { change_id } => (
                "Thank you for the pull request! It has been submitted to Gerrit for code review as",
                change_id,
            ),
            ReconcileOutcome::Updated { change_id } => (
                "The new commits of this pull request have been pushed to Gerrit as a new patch set of",
                change_id,
            ),
        };

        let mut text = format!("{lead} {change_id}.");
        if let Some(base) = self.web_url.as_deref() {
            text.push_str(&format!(
                " Review and follow it at {}/#/q/{change_id}",
                base.trim_end_matches('/')
            ));
        }
        Some(text)
    }
}

/// Drives a workspace through apply, squash, commit, push and comment.
pub struct Reconciler<'a> {
    forge: &'a dyn ForgeGateway,
    git: &'a dyn GitOperations,
    store: &'a TrackedPatchStore,
    workspaces: &'a WorkspaceManager,
    telemetry: &'a dyn TelemetrySink,
    target: &'a GerritTarget,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler over the given collaborators.
    #[must_use]
    pub const fn new(
        forge: &'a dyn ForgeGateway,
        git: &'a dyn GitOperations,
        store: &'a TrackedPatchStore,
        workspaces: &'a WorkspaceManager,
        telemetry: &'a dyn TelemetrySink,
        target: &'a GerritTarget,
    ) -> Self {
        Self {
            forge,
            git,
            store,
            workspaces,
            telemetry,
            target,
        }
    }

    /// Reconciles `pull_request` against the clone at `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when any download, git, store, or comment step
    /// fails; later steps are not attempted.
    pub async fn reconcile(
        &self,
        repository: &str,
        workspace: &Utf8Path,
        pull_request: &PullRequest,
    ) -> Result<ReconcileOutcome, SyncError> {
        let patch_url = &pull_request.patch_url;
        tracing::info!(
            repository,
            number = pull_request.number,
            title = %pull_request.title,
            "processing pull request"
        );

        let content = self.forge.download_patch(pull_request).await?;
        let patch_file = self
            .workspaces
            .write_patch(repository, patch_url, &content)?;
        let content_hash = ContentHash::of(content.as_bytes());
        let record = self.store.find(patch_url)?;

        let outcome = match decide(record.as_ref(), &content_hash) {
            ReconcileDecision::Skip => {
                tracing::info!(%patch_url, "patch unchanged; skipping");
                ReconcileOutcome::Skipped
            }
            ReconcileDecision::SubmitNew => {
                self.commit_squashed(workspace, &patch_file, pull_request, None)
                    .await?;
                let change_id = self.read_minted_change_id(workspace, pull_request)?;
                self.store.insert(&TrackedPatch {
                    patch_url: patch_url.clone(),
                    change_id: change_id.clone(),
                    repository: repository.to_owned(),
                    content_hash: ContentHash::pending(),
                })?;
                self.push(workspace)?;
                self.store.update_hash(patch_url, &content_hash)?;
                ReconcileOutcome::Submitted { change_id }
            }
            ReconcileDecision::SubmitUpdate { change_id } => {
                self.commit_squashed(workspace, &patch_file, pull_request, Some(&change_id))
                    .await?;
                self.push(workspace)?;
                self.store.update_hash(patch_url, &content_hash)?;
                ReconcileOutcome::Updated { change_id }
            }
        };

        if let Some(text) = self.target.comment(&outcome) {
            self.forge.post_comment(pull_request, &text).await?;
        }

        tracing::info!(%patch_url, outcome = outcome.label(), "pull request reconciled");
        self.telemetry.record(TelemetryEvent::PullRequestReconciled {
            repository: repository.to_owned(),
            patch_url: patch_url.to_string(),
            outcome: outcome.label().to_owned(),
            change_id: outcome.change_id().map(ToString::to_string),
        });
        Ok(outcome)
    }

    async fn commit_squashed(
        &self,
        workspace: &Utf8Path,
        patch_file: &Utf8Path,
        pull_request: &PullRequest,
        change_id: Option<&ChangeId>,
    ) -> Result<(), SyncError> {
        let applied = self.git.apply_mailbox(workspace, patch_file)?;
        tracing::debug!(applied, "squashing applied commits");
        self.git.soft_reset(workspace, applied)?;

        let author = self
            .forge
            .author_identity(&pull_request.author_login)
            .await?;
        let commit_message = message::compose(pull_request, change_id);
        self.git
            .commit(workspace, &commit_message, &author.to_string())?;
        Ok(())
    }

    fn read_minted_change_id(
        &self,
        workspace: &Utf8Path,
        pull_request: &PullRequest,
    ) -> Result<ChangeId, SyncError> {
        let head_message = self.git.head_message(workspace)?;
        trailers::find_change_id(&head_message).ok_or_else(|| SyncError::MissingChangeId {
            patch_url: pull_request.patch_url.to_string(),
        })
    }

    fn push(&self, workspace: &Utf8Path) -> Result<(), SyncError> {
        self.git
            .push(workspace, &self.target.remote, &self.target.refspec())?;
        Ok(())
    }
}
