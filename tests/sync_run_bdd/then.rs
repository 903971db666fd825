//! Then steps for sync run behavioural tests.

use gerrit_sync::reconcile::trailers::find_change_id;
use gerrit_sync::{ChangeId, ContentHash, PatchUrl, SyncError};
use rstest_bdd_macros::then;

use crate::support::github_server::{comments_on, patch_for, patch_url};
use crate::sync_run_bdd_state::SyncState;

fn comments(sync_state: &SyncState, number: u64) -> Vec<String> {
    let runtime = sync_state.runtime();
    let repository = sync_state.repository();
    sync_state
        .server
        .with_ref(|server| comments_on(&runtime, server, &repository, number))
        .unwrap_or_default()
}

fn last_pushed_change_id(sync_state: &SyncState) -> Option<ChangeId> {
    sync_state
        .git()
        .pushed_messages()
        .last()
        .and_then(|message| find_change_id(message))
}

#[then("{count:usize} change is pushed to Gerrit")]
fn pushed_count(sync_state: &SyncState, count: usize) {
    assert_eq!(sync_state.git().pushed_messages().len(), count);
}

#[then("the pushed commit carries the Change-Id {expected}")]
fn pushed_change_id(sync_state: &SyncState, expected: String) {
    let expected_id = ChangeId::new(expected.trim_matches('"').to_owned());
    assert_eq!(last_pushed_change_id(sync_state), Some(expected_id));
}

#[then("the pushed commit carries the minted Change-Id")]
fn pushed_minted_change_id(sync_state: &SyncState) {
    let minted = sync_state.git().minted();
    assert_eq!(minted.len(), 1, "exactly one Change-Id should be minted");
    assert_eq!(last_pushed_change_id(sync_state).as_ref(), minted.first());
}

#[then("pull request {number:u64} is recorded with its current patch digest")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn recorded_with_digest(sync_state: &SyncState, number: u64) {
    let url = PatchUrl::new(patch_url(&sync_state.repository(), number));
    let record = sync_state
        .store()
        .find(&url)
        .expect("lookup should succeed")
        .expect("pull request should be tracked");
    assert_eq!(record.content_hash, ContentHash::of(patch_for(number).as_bytes()));
}

#[then("pull request {number:u64} receives a comment naming its change")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn comment_names_change(sync_state: &SyncState, number: u64) {
    let url = PatchUrl::new(patch_url(&sync_state.repository(), number));
    let record = sync_state
        .store()
        .find(&url)
        .expect("lookup should succeed")
        .expect("pull request should be tracked");
    let posted = comments(sync_state, number);
    assert_eq!(posted.len(), 1, "expected one comment, got {posted:?}");
    assert!(
        posted
            .iter()
            .all(|body| body.contains(record.change_id.as_str())),
        "comment should name {}: {posted:?}",
        record.change_id
    );
}

#[then("pull request {number:u64} receives no comment")]
fn no_comment(sync_state: &SyncState, number: u64) {
    let posted = comments(sync_state, number);
    assert!(posted.is_empty(), "unexpected comments: {posted:?}");
}

#[then("the run reports {submitted:usize} submitted, {updated:usize} updated and {skipped:usize} skipped")]
fn run_summary(sync_state: &SyncState, submitted: usize, updated: usize, skipped: usize) {
    let Some(summary) = sync_state.summary.get() else {
        let error = sync_state.error.with_ref(Clone::clone);
        panic!("sync run produced no summary; last error: {error:?}");
    };
    assert_eq!(
        (summary.submitted, summary.updated, summary.skipped),
        (submitted, updated, skipped)
    );
}

#[then("the first run fails with a git error")]
fn first_run_failed(sync_state: &SyncState) {
    let error = sync_state.first_error.with_ref(Clone::clone);
    assert!(
        matches!(error, Some(SyncError::Workspace(_))),
        "expected a git failure, got {error:?}"
    );
}
