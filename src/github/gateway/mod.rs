//! Gateways for talking to GitHub through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests.

mod author_cache;
mod client;
mod error_mapping;
mod forge;

pub use forge::OctocrabForgeGateway;

use async_trait::async_trait;

use crate::github::error::ForgeError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{AuthorIdentity, PullRequest};

/// Remote source of pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForgeGateway: Send + Sync {
    /// Lists every open pull request of the repository, following pagination.
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequest>, ForgeError>;

    /// Resolves a login to the identity used as commit author.
    async fn author_identity(&self, login: &str) -> Result<AuthorIdentity, ForgeError>;

    /// Appends a comment to the pull request's discussion.
    async fn post_comment(&self, pull_request: &PullRequest, text: &str)
    -> Result<(), ForgeError>;

    /// Downloads the mailbox-formatted patch series of the pull request.
    async fn download_patch(&self, pull_request: &PullRequest) -> Result<String, ForgeError>;
}
