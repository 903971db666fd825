//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::config::GitHubCredentials;
use crate::github::error::ForgeError;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given credentials and API base URL.
///
/// # Errors
///
/// Returns `ForgeError::InvalidUrl` when the base URL is not an absolute
/// HTTP(S) URL or
/// `ForgeError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    credentials: &GitHubCredentials,
    api_base: &str,
) -> Result<Octocrab, ForgeError> {
    let base_url =
        Url::parse(api_base).map_err(|error| ForgeError::InvalidUrl(error.to_string()))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ForgeError::InvalidUrl(format!(
            "unsupported scheme `{}` in {api_base}",
            base_url.scheme()
        )));
    }
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ForgeError::InvalidUrl(error.to_string()))?;

    let unauthenticated = Octocrab::builder();
    let authenticated = match credentials {
        GitHubCredentials::Basic { username, password } => {
            unauthenticated.basic_auth(username.clone(), password.expose().to_owned())
        }
        GitHubCredentials::Token(token) => unauthenticated.personal_token(token.expose()),
        GitHubCredentials::Anonymous => unauthenticated,
    };

    authenticated
        .base_uri(base_uri)
        .map_err(|error| ForgeError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
