//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach. A JSON overlay fetched from a
//! wiki page can then fill in anything the local layers left unset.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Remote overlay** – JSON object stored on the `mw_page` wiki page
//! 2. **Defaults** – Built-in application defaults
//! 3. **Configuration file** – `.gerrit-sync.toml` in current directory, home
//!    directory, or XDG config directory
//! 4. **Environment variables** – `GERRIT_SYNC_*`
//! 5. **Command-line arguments** – `--repos`, `--gh-account`, ...
//!
//! # Configuration File
//!
//! ```toml
//! repos = ["mediawiki-extensions-Foo"]
//! gh_account = "wikimedia"
//! gh_username = "sync-bot"
//! gh_password_file = "~/.config/gerrit-sync/password"
//! git_repo_path = "~/sync"
//! git_clone = "https://gerrit.example.org/r/$1"
//! gerrit_username = "sync-bot"
//! db_location = "~/sync/pull_requests.sqlite"
//! ```

mod credentials;
mod error;
mod overlay;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use credentials::{AuthSecret, GitHubCredentials};
pub use error::ConfigError;
pub use overlay::RemoteConfigOverlay;

const DEFAULT_GH_API_BASE: &str = "https://api.github.com";
const DEFAULT_GERRIT_REMOTE: &str = "gerrit";
const DEFAULT_BRANCH: &str = "master";
const CLONE_PLACEHOLDER: &str = "$1";

/// Sync bot configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use gerrit_sync::SyncConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = SyncConfig::load().expect("failed to load configuration");
/// let account = config.require_gh_account().expect("account required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GERRIT_SYNC",
    discovery(
        dotfile_name = ".gerrit-sync.toml",
        config_file_name = "gerrit-sync.toml",
        app_name = "gerrit-sync"
    )
)]
pub struct SyncConfig {
    /// Repository names to track, processed in order.
    #[ortho_config()]
    pub repos: Vec<String>,

    /// GitHub account or organisation owning the tracked repositories.
    #[ortho_config(cli_short = 'a')]
    pub gh_account: Option<String>,

    /// GitHub username for basic authentication.
    #[ortho_config()]
    pub gh_username: Option<String>,

    /// Inline GitHub password. `gh_password_file` wins when both are set.
    #[ortho_config()]
    pub gh_password: Option<String>,

    /// File holding the GitHub password; surrounding whitespace is trimmed.
    #[ortho_config()]
    pub gh_password_file: Option<String>,

    /// Personal access token, used only when no username is configured.
    #[ortho_config()]
    pub gh_token: Option<String>,

    /// GitHub REST API base URL.
    #[ortho_config()]
    pub gh_api_base: String,

    /// Directory under which every tracked repository is cloned.
    #[ortho_config()]
    pub git_repo_path: Option<String>,

    /// Clone URL template; `$1` is replaced with the repository name.
    #[ortho_config()]
    pub git_clone: Option<String>,

    /// Gerrit username used by `git review -s`.
    #[ortho_config()]
    pub gerrit_username: Option<String>,

    /// Name of the git remote that `git review -s` sets up.
    #[ortho_config()]
    pub gerrit_remote: String,

    /// Gerrit web UI base URL used to link changes in comments.
    #[ortho_config()]
    pub gerrit_url: Option<String>,

    /// Upstream branch every change is proposed against.
    #[ortho_config(cli_short = 'b')]
    pub default_branch: String,

    /// MediaWiki `index.php` endpoint serving the remote overlay.
    #[ortho_config()]
    pub mw_index: Option<String>,

    /// Title of the wiki page holding the JSON overlay.
    #[ortho_config()]
    pub mw_page: Option<String>,

    /// `SQLite` database path for tracked patches (`~` is expanded).
    #[ortho_config(cli_short = 'd')]
    pub db_location: Option<String>,

    /// Runs database migrations and exits.
    ///
    /// Note: `ortho_config` does not load boolean values from the environment.
    #[ortho_config()]
    pub migrate_db: bool,

    /// Emits JSONL telemetry events on stderr.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            gh_account: None,
            gh_username: None,
            gh_password: None,
            gh_password_file: None,
            gh_token: None,
            gh_api_base: DEFAULT_GH_API_BASE.to_owned(),
            git_repo_path: None,
            git_clone: None,
            gerrit_username: None,
            gerrit_remote: DEFAULT_GERRIT_REMOTE.to_owned(),
            gerrit_url: None,
            default_branch: DEFAULT_BRANCH.to_owned(),
            mw_index: None,
            mw_page: None,
            db_location: None,
            migrate_db: false,
            telemetry: false,
        }
    }
}

impl SyncConfig {
    /// Returns the wiki endpoint and page when both are configured.
    #[must_use]
    pub fn remote_overlay_source(&self) -> Option<(&str, &str)> {
        self.mw_index.as_deref().zip(self.mw_page.as_deref())
    }

    /// Fills unset values from the remote overlay.
    ///
    /// Local values always win. `repos` is taken from the overlay only when
    /// no repository was configured locally.
    pub fn overlay_remote(&mut self, remote: RemoteConfigOverlay) {
        overlay::apply(self, remote);
    }

    /// Returns the GitHub account owning the tracked repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `gh_account` is unset.
    pub fn require_gh_account(&self) -> Result<&str, ConfigError> {
        self.gh_account
            .as_deref()
            .ok_or(ConfigError::Missing { key: "gh_account" })
    }

    /// Returns the Gerrit username used during workspace registration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `gerrit_username` is unset.
    pub fn require_gerrit_username(&self) -> Result<&str, ConfigError> {
        self.gerrit_username
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: "gerrit_username",
            })
    }

    /// Returns the clone URL template after checking it carries `$1`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when unset, or
    /// [`ConfigError::Invalid`] when the placeholder is absent.
    pub fn require_clone_template(&self) -> Result<&str, ConfigError> {
        let template = self
            .git_clone
            .as_deref()
            .ok_or(ConfigError::Missing { key: "git_clone" })?;
        if !template.contains(CLONE_PLACEHOLDER) {
            return Err(ConfigError::Invalid {
                key: "git_clone",
                message: format!("template must contain the {CLONE_PLACEHOLDER} placeholder"),
            });
        }
        Ok(template)
    }

    /// Returns the directory holding every workspace, with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `git_repo_path` is unset.
    pub fn repo_root(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.git_repo_path
            .as_deref()
            .map(expand_home)
            .ok_or(ConfigError::Missing {
                key: "git_repo_path",
            })
    }

    /// Returns the `SQLite` database path, with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `db_location` is unset.
    pub fn database_path(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.db_location
            .as_deref()
            .map(expand_home)
            .ok_or(ConfigError::Missing { key: "db_location" })
    }

    /// Resolves GitHub credentials from the configured secret sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a password file cannot be read or a
    /// secret is blank.
    pub fn resolve_credentials(&self) -> Result<GitHubCredentials, ConfigError> {
        credentials::resolve(self)
    }
}

/// Substitutes the repository name into a clone URL template.
#[must_use]
pub fn clone_url(template: &str, repository: &str) -> String {
    template.replace(CLONE_PLACEHOLDER, repository)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or a missing `HOME`, are returned unchanged.
#[must_use]
pub fn expand_home(path: &str) -> Utf8PathBuf {
    let home = std::env::var("HOME").ok().filter(|value| !value.is_empty());
    match (path, home) {
        ("~", Some(home_dir)) => Utf8PathBuf::from(home_dir),
        (_, Some(home_dir)) if path.starts_with("~/") => {
            let rest = path.trim_start_matches('~').trim_start_matches('/');
            Utf8PathBuf::from(home_dir).join(rest)
        }
        _ => Utf8PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests;
