//! Scenario state and shared utilities for sync run BDD tests.

use std::sync::Arc;

use gerrit_sync::persistence::TrackedPatchStore;
use gerrit_sync::{RunSummary, SyncConfig, SyncError};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;
use wiremock::MockServer;

pub(crate) use crate::support::runtime::SharedRuntime;
pub(crate) use crate::support::scripted_git::ScriptedGit;

#[derive(ScenarioState, Default)]
pub(crate) struct SyncState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) temp_dir: Slot<TempDir>,
    pub(crate) repository: Slot<String>,
    pub(crate) config: Slot<SyncConfig>,
    pub(crate) git: Slot<Arc<ScriptedGit>>,
    pub(crate) first_error: Slot<SyncError>,
    pub(crate) summary: Slot<RunSummary>,
    pub(crate) error: Slot<SyncError>,
}

impl SyncState {
    #[expect(
        clippy::expect_used,
        reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
    )]
    pub(crate) fn runtime(&self) -> SharedRuntime {
        self.runtime.get().expect("runtime not initialised")
    }

    #[expect(
        clippy::expect_used,
        reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
    )]
    pub(crate) fn repository(&self) -> String {
        self.repository.get().expect("repository not configured")
    }

    #[expect(
        clippy::expect_used,
        reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
    )]
    pub(crate) fn git(&self) -> Arc<ScriptedGit> {
        self.git.get().expect("git backend not initialised")
    }

    #[expect(
        clippy::expect_used,
        reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
    )]
    pub(crate) fn store(&self) -> TrackedPatchStore {
        let config = self.config.get().expect("configuration not initialised");
        let location = config
            .database_path()
            .expect("database location should be configured");
        TrackedPatchStore::open(location.as_str()).expect("content store should open")
    }
}
