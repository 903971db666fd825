//! GitHub credential resolution.
//!
//! An inline password and a password file are two sources of the same secret.
//! Both are resolved once at start-up into [`GitHubCredentials`]; secrets are
//! only ever handed to the HTTP client and never appear on a command line or
//! in `Debug` output.

use std::fmt;
use std::fs;

use super::{ConfigError, SyncConfig, expand_home};

/// A secret value whose `Debug` representation is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSecret(String);

impl AuthSecret {
    /// Wraps a secret after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlankSecret`] when nothing remains after
    /// trimming.
    pub fn new(value: &str, key: &'static str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::BlankSecret { key });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the secret value.
    #[must_use]
    pub const fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(<redacted>)")
    }
}

/// How the forge client authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubCredentials {
    /// Username and password (basic authentication).
    Basic {
        /// GitHub login.
        username: String,
        /// Password or token used as the basic-auth password.
        password: AuthSecret,
    },
    /// Personal access token.
    Token(AuthSecret),
    /// No credentials; read-only calls only.
    Anonymous,
}

pub(super) fn resolve(config: &SyncConfig) -> Result<GitHubCredentials, ConfigError> {
    if let Some(username) = config.gh_username.as_deref() {
        let Some(password) = resolve_password(config)? else {
            return Err(ConfigError::Missing {
                key: "gh_password",
            });
        };
        return Ok(GitHubCredentials::Basic {
            username: username.to_owned(),
            password,
        });
    }

    if let Some(token) = config.gh_token.as_deref() {
        return AuthSecret::new(token, "gh_token").map(GitHubCredentials::Token);
    }

    Ok(GitHubCredentials::Anonymous)
}

/// Password file first (when it exists), then the inline password.
fn resolve_password(config: &SyncConfig) -> Result<Option<AuthSecret>, ConfigError> {
    if let Some(file) = config.gh_password_file.as_deref() {
        let path = expand_home(file);
        if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|error| ConfigError::SecretFile {
                path: path.to_string(),
                message: error.to_string(),
            })?;
            return AuthSecret::new(&contents, "gh_password_file").map(Some);
        }
        if config.gh_password.is_none() {
            return Err(ConfigError::SecretFile {
                path: path.to_string(),
                message: "file does not exist".to_owned(),
            });
        }
    }

    config
        .gh_password
        .as_deref()
        .map(|password| AuthSecret::new(password, "gh_password"))
        .transpose()
}
