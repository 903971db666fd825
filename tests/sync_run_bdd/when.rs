//! When steps for sync run behavioural tests.

use std::sync::Arc;

use gerrit_sync::telemetry::NoopTelemetrySink;
use gerrit_sync::{
    GitHubCredentials, OctocrabForgeGateway, RunSummary, SyncBot, SyncConfig, SyncError, SyncParts,
};
use rstest_bdd_macros::when;

use crate::sync_run_bdd_state::{ScriptedGit, SyncState};

async fn sync_once(config: &SyncConfig, git: Arc<ScriptedGit>) -> Result<RunSummary, SyncError> {
    let forge =
        OctocrabForgeGateway::for_credentials(&GitHubCredentials::Anonymous, &config.gh_api_base)?;
    let bot = SyncBot::from_config(
        config,
        SyncParts {
            forge: Arc::new(forge),
            git,
            telemetry: Arc::new(NoopTelemetrySink),
        },
    )?;
    bot.run().await
}

#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
fn run_bot(sync_state: &SyncState) -> Result<RunSummary, SyncError> {
    let config = sync_state.config.get().expect("configuration not initialised");
    sync_state
        .runtime()
        .block_on(sync_once(&config, sync_state.git()))
}

fn record_result(sync_state: &SyncState, result: Result<RunSummary, SyncError>) {
    match result {
        Ok(summary) => {
            sync_state.summary.set(summary);
        }
        Err(error) => {
            sync_state.error.set(error);
        }
    }
}

#[when("the sync bot runs")]
fn sync_bot_runs(sync_state: &SyncState) {
    record_result(sync_state, run_bot(sync_state));
}

#[when("the sync bot runs twice")]
fn sync_bot_runs_twice(sync_state: &SyncState) {
    if let Err(error) = run_bot(sync_state) {
        sync_state.first_error.set(error);
    }
    record_result(sync_state, run_bot(sync_state));
}
