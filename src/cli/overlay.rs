//! Remote configuration overlay.

use gerrit_sync::{MediaWikiClient, RemoteConfigOverlay, SyncConfig, SyncError};

/// Fetches the wiki page named by `mw_index`/`mw_page` and fills unset
/// configuration values from it. Does nothing unless both are configured.
///
/// The wiki client blocks, so the request runs on Tokio's blocking pool.
///
/// # Errors
///
/// Returns [`SyncError::Wiki`] when the page cannot be fetched or parsed and
/// [`SyncError::Config`] when it is not a JSON object.
pub async fn apply(config: &mut SyncConfig) -> Result<(), SyncError> {
    let Some((index, page)) = config.remote_overlay_source() else {
        tracing::debug!("no wiki overlay configured");
        return Ok(());
    };
    let client = MediaWikiClient::new(index);
    let title = page.to_owned();

    tracing::info!(page = %title, "loading configuration overlay from wiki");
    let value = tokio::task::spawn_blocking(move || client.fetch_json(&title))
        .await
        .map_err(|error| SyncError::Task {
            message: error.to_string(),
        })??;

    config.overlay_remote(RemoteConfigOverlay::from_json(value)?);
    Ok(())
}
