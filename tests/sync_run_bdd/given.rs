//! Given steps for sync run behavioural tests.

use std::sync::Arc;

use gerrit_sync::persistence::TrackedPatch;
use gerrit_sync::{ChangeId, ContentHash, PatchUrl, SyncConfig};
use rstest_bdd_macros::given;

use crate::support::create_temp_dir;
use crate::support::github_server::{OWNER, mount_repository, patch_for, patch_url};
use crate::support::runtime::ensure_runtime_and_server;
use crate::sync_run_bdd_state::{ScriptedGit, SyncState};

const OLDER_PATCH: &str = "From 0000000000000000000000000000000000000000 Mon Sep 17 00:00:00 2001\n";

#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
fn track_repository(sync_state: &SyncState, repository: &str, numbers: &[u64]) {
    let runtime = ensure_runtime_and_server(&sync_state.runtime, &sync_state.server);
    let api_base = sync_state
        .server
        .with_ref(|server| {
            mount_repository(&runtime, server, repository, numbers);
            server.uri()
        })
        .expect("mock server not initialised");

    let temp_dir = create_temp_dir();
    let root = temp_dir.path().display().to_string();
    sync_state.config.set(SyncConfig {
        repos: vec![repository.to_owned()],
        gh_account: Some(OWNER.to_owned()),
        gh_api_base: api_base,
        git_repo_path: Some(format!("{root}/repos")),
        git_clone: Some("https://gerrit.example.org/r/$1".to_owned()),
        gerrit_username: Some("sync-bot".to_owned()),
        db_location: Some(format!("{root}/sync.sqlite")),
        ..SyncConfig::default()
    });
    sync_state.temp_dir.set(temp_dir);
    sync_state.repository.set(repository.to_owned());
    sync_state.git.set(Arc::new(ScriptedGit::default()));
}

#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
fn seed_record(sync_state: &SyncState, number: u64, change_id: &str, patch: &str) {
    let repository = sync_state.repository();
    sync_state
        .store()
        .insert(&TrackedPatch {
            patch_url: PatchUrl::new(patch_url(&repository, number)),
            change_id: ChangeId::new(change_id.to_owned()),
            repository,
            content_hash: ContentHash::of(patch.as_bytes()),
        })
        .expect("record should insert");
}

#[given("the repository {repository} has open pull requests {first:u64} and {second:u64}")]
fn repository_with_two_pulls(sync_state: &SyncState, repository: String, first: u64, second: u64) {
    track_repository(sync_state, repository.trim_matches('"'), &[first, second]);
}

#[given("the repository {repository} has open pull request {number:u64}")]
fn repository_with_one_pull(sync_state: &SyncState, repository: String, number: u64) {
    track_repository(sync_state, repository.trim_matches('"'), &[number]);
}

#[given("pull request {number:u64} was already submitted with its current patch")]
fn already_submitted(sync_state: &SyncState, number: u64) {
    seed_record(
        sync_state,
        number,
        "I1111111111111111111111111111111111111111",
        &patch_for(number),
    );
}

#[given("pull request {number:u64} was submitted as {change_id} with an older patch")]
fn submitted_with_older_patch(sync_state: &SyncState, number: u64, change_id: String) {
    seed_record(sync_state, number, change_id.trim_matches('"'), OLDER_PATCH);
}

#[given("Gerrit rejects the next push")]
fn gerrit_rejects_next_push(sync_state: &SyncState) {
    sync_state.git().reject_next_push();
}
