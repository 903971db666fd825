//! Octocrab-backed [`ForgeGateway`].

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use http::header::{ACCEPT, HeaderMap, HeaderValue};
use http::{StatusCode, Uri};
use octocrab::{Octocrab, Page};
use serde::Serialize;

use crate::config::GitHubCredentials;
use crate::github::error::ForgeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{ApiPullRequest, ApiUser, AuthorIdentity, PullRequest};

use super::ForgeGateway;
use super::author_cache::AuthorCache;
use super::client::build_octocrab_client;
use super::error_mapping::{extract_github_message, map_http_error, map_octocrab_error};

const PATCH_MEDIA_TYPE: &str = "application/vnd.github.v3.patch";

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Octocrab-backed gateway for the sync bot's GitHub calls.
pub struct OctocrabForgeGateway {
    client: Octocrab,
    authors: Mutex<AuthorCache>,
}

impl OctocrabForgeGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            authors: Mutex::new(AuthorCache::default()),
        }
    }

    /// Builds a gateway for the given credentials and API base URL.
    ///
    /// Must be called within a Tokio runtime context.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidUrl` when the base URL is not an absolute
    /// HTTP(S) URL or `ForgeError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_credentials(
        credentials: &GitHubCredentials,
        api_base: &str,
    ) -> Result<Self, ForgeError> {
        let octocrab = build_octocrab_client(credentials, api_base)?;
        Ok(Self::new(octocrab))
    }

    fn cached_author(&self, login: &str) -> Option<AuthorIdentity> {
        self.authors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(login)
    }

    fn remember_author(&self, login: &str, identity: AuthorIdentity) {
        self.authors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(login, identity);
    }
}

#[async_trait]
impl ForgeGateway for OctocrabForgeGateway {
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequest>, ForgeError> {
        let query_params = [("state", "open"), ("per_page", "100")];

        let page = self
            .client
            .get::<Page<ApiPullRequest>, _, _>(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        let pulls = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        pulls
            .into_iter()
            .map(|api| api.into_domain(locator))
            .collect()
    }

    async fn author_identity(&self, login: &str) -> Result<AuthorIdentity, ForgeError> {
        if let Some(identity) = self.cached_author(login) {
            return Ok(identity);
        }

        let user = self
            .client
            .get::<ApiUser, _, _>(format!("/users/{login}"), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("user profile", &error))?;

        let identity = user.into_identity(login);
        self.remember_author(login, identity.clone());
        Ok(identity)
    }

    async fn post_comment(
        &self,
        pull_request: &PullRequest,
        text: &str,
    ) -> Result<(), ForgeError> {
        let path = pull_request
            .locator
            .issue_comments_path(pull_request.number);
        let _created: serde_json::Value = self
            .client
            .post(path, Some(&CommentRequest { body: text }))
            .await
            .map_err(|error| map_octocrab_error("post comment", &error))?;
        Ok(())
    }

    async fn download_patch(&self, pull_request: &PullRequest) -> Result<String, ForgeError> {
        let uri: Uri = pull_request
            .locator
            .pull_request_path(pull_request.number)
            .parse::<Uri>()
            .map_err(|error| ForgeError::InvalidUrl(error.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(PATCH_MEDIA_TYPE));

        let response = self
            .client
            ._get_with_headers(uri, Some(headers))
            .await
            .map_err(|error| map_octocrab_error("download patch", &error))?;

        let status = response.status();
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| ForgeError::Api {
                message: format!("patch response decode failed: {error}"),
            });

        if status == StatusCode::OK {
            return body;
        }

        Err(map_http_error(
            "download patch",
            status,
            body.ok().as_deref().and_then(extract_github_message),
        ))
    }
}
