//! Pull request and user models.
//!
//! Types prefixed with `Api` are deserialisation targets for GitHub responses
//! and convert into the domain types used by the reconciler.

use serde::Deserialize;

use super::error::ForgeError;
use super::locator::RepositoryLocator;
use crate::types::PatchUrl;

/// An open pull request as seen by the sync bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Repository the pull request was opened against.
    pub locator: RepositoryLocator,
    /// Pull request number.
    pub number: u64,
    /// Title, used as the commit subject.
    pub title: String,
    /// Description; empty when the author left none.
    pub body: String,
    /// Login of the submitter.
    pub author_login: String,
    /// URL of the `.patch` rendering; the store's key.
    pub patch_url: PatchUrl,
    /// Browser URL, referenced from the commit message.
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) body: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) patch_url: Option<String>,
    pub(super) user: Option<ApiUser>,
}

impl ApiPullRequest {
    pub(super) fn into_domain(
        self,
        locator: &RepositoryLocator,
    ) -> Result<PullRequest, ForgeError> {
        let number = self.number;
        let missing = |field| ForgeError::MissingField { number, field };

        let html_url = self.html_url.ok_or_else(|| missing("html_url"))?;
        let patch_url = self
            .patch_url
            .unwrap_or_else(|| format!("{html_url}.patch"));
        let author_login = self
            .user
            .and_then(|user| user.login)
            .ok_or_else(|| missing("user.login"))?;

        Ok(PullRequest {
            locator: locator.clone(),
            number,
            title: self.title.ok_or_else(|| missing("title"))?,
            body: self.body.unwrap_or_default(),
            author_login,
            patch_url: PatchUrl::new(patch_url),
            html_url,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

/// Commit author derived from a GitHub profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorIdentity {
    /// Display name.
    pub name: String,
    /// E-mail address.
    pub email: String,
}

impl AuthorIdentity {
    /// Builds an identity from a profile, falling back to the login for a
    /// missing name and to the GitHub no-reply address for a hidden email.
    #[must_use]
    pub fn from_profile(login: &str, name: Option<&str>, email: Option<&str>) -> Self {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|candidate| !candidate.is_empty())
                .map(ToOwned::to_owned)
        };
        Self {
            name: non_blank(name).unwrap_or_else(|| login.to_owned()),
            email: non_blank(email)
                .unwrap_or_else(|| format!("{login}@users.noreply.github.com")),
        }
    }
}

impl std::fmt::Display for AuthorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl ApiUser {
    pub(super) fn into_identity(self, requested_login: &str) -> AuthorIdentity {
        let login = self.login.as_deref().unwrap_or(requested_login);
        AuthorIdentity::from_profile(login, self.name.as_deref(), self.email.as_deref())
    }
}
