//! One synchronisation run.

use std::sync::Arc;

use gerrit_sync::{
    GitHubCredentials, OctocrabForgeGateway, SyncBot, SyncConfig, SyncError, SyncParts, SystemGit,
};

use super::telemetry_sink;

/// Builds the production collaborators and runs the bot once.
///
/// # Errors
///
/// Returns the first [`SyncError`] raised while building or running the bot.
pub async fn run(config: &SyncConfig) -> Result<(), SyncError> {
    let credentials = config.resolve_credentials()?;
    if credentials == GitHubCredentials::Anonymous {
        tracing::warn!("no GitHub credentials configured; comments will be rejected");
    }

    let forge = OctocrabForgeGateway::for_credentials(&credentials, &config.gh_api_base)?;
    let bot = SyncBot::from_config(
        config,
        SyncParts {
            forge: Arc::new(forge),
            git: Arc::new(SystemGit::default()),
            telemetry: telemetry_sink(config),
        },
    )?;

    bot.run().await.map(drop)
}
