//! Remote configuration overlay fetched from a wiki page.
//!
//! The page holds a JSON object using the historical dotted key names
//! (`gh.account`, `git.clone`, ...). Snake-case names are accepted too.

use serde::Deserialize;
use serde_json::Value;

use super::{ConfigError, SyncConfig};

/// Values supplied by the remote overlay. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteConfigOverlay {
    /// Repository names to track.
    #[serde(default)]
    pub repos: Vec<String>,
    /// GitHub account owning the repositories.
    #[serde(rename = "gh.account", alias = "gh_account")]
    pub gh_account: Option<String>,
    /// GitHub username.
    #[serde(rename = "gh.username", alias = "gh_username")]
    pub gh_username: Option<String>,
    /// Workspace root directory.
    #[serde(rename = "git.repo_path", alias = "git_repo_path")]
    pub git_repo_path: Option<String>,
    /// Clone URL template.
    #[serde(rename = "git.clone", alias = "git_clone")]
    pub git_clone: Option<String>,
    /// Gerrit username.
    #[serde(rename = "gerrit.username", alias = "gerrit_username")]
    pub gerrit_username: Option<String>,
    /// Gerrit web UI base URL.
    #[serde(rename = "gerrit.url", alias = "gerrit_url")]
    pub gerrit_url: Option<String>,
    /// Database location.
    #[serde(rename = "db.location", alias = "db_location")]
    pub db_location: Option<String>,
}

impl RemoteConfigOverlay {
    /// Parses an overlay from a JSON value.
    ///
    /// Unknown keys are ignored so the page can carry settings for other
    /// tools.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverlay`] when the value is not an
    /// object or a known key has the wrong type.
    pub fn from_json(value: Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::InvalidOverlay {
                message: "expected a JSON object".to_owned(),
            });
        }
        serde_json::from_value(value).map_err(|error| ConfigError::InvalidOverlay {
            message: error.to_string(),
        })
    }
}

pub(super) fn apply(config: &mut SyncConfig, remote: RemoteConfigOverlay) {
    if config.repos.is_empty() {
        config.repos = remote.repos;
    }
    fill(&mut config.gh_account, remote.gh_account);
    fill(&mut config.gh_username, remote.gh_username);
    fill(&mut config.git_repo_path, remote.git_repo_path);
    fill(&mut config.git_clone, remote.git_clone);
    fill(&mut config.gerrit_username, remote.gerrit_username);
    fill(&mut config.gerrit_url, remote.gerrit_url);
    fill(&mut config.db_location, remote.db_location);
}

fn fill(local: &mut Option<String>, remote: Option<String>) {
    if local.is_none() {
        *local = remote;
    }
}
