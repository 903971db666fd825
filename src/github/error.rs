//! Error types exposed by the GitHub client.

use thiserror::Error;

/// Errors surfaced while communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// A URL or API path could not be parsed.
    #[error("GitHub URL is invalid: {0}")]
    InvalidUrl(String),

    /// An owner or repository name was empty.
    #[error("repository owner and name must not be empty")]
    MissingPathSegments,

    /// GitHub rejected the credentials.
    #[error("GitHub rejected the credentials: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// A pull request payload lacked a field the sync needs.
    #[error("pull request #{number} is missing `{field}`")]
    MissingField {
        /// Pull request number.
        number: u64,
        /// Missing JSON field.
        field: &'static str,
    },
}
