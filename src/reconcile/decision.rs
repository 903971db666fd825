//! The skip / update / submit decision for one pull request.

use crate::persistence::TrackedPatch;
use crate::types::{ChangeId, ContentHash};

/// What to do with a downloaded patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// The patch is unchanged since it was last pushed.
    Skip,
    /// The pull request has never been pushed.
    SubmitNew,
    /// The patch changed; push a new patch set of the existing change.
    SubmitUpdate {
        /// Identifier recorded on first submission.
        change_id: ChangeId,
    },
}

/// Decides from the stored record and the digest of the fresh download.
#[must_use]
pub fn decide(record: Option<&TrackedPatch>, content_hash: &ContentHash) -> ReconcileDecision {
    match record {
        None => ReconcileDecision::SubmitNew,
        Some(existing) if existing.content_hash == *content_hash => ReconcileDecision::Skip,
        Some(existing) => ReconcileDecision::SubmitUpdate {
            change_id: existing.change_id.clone(),
        },
    }
}
