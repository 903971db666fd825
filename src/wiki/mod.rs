//! MediaWiki client used to fetch the remote configuration overlay.
//!
//! The overlay is a JSON object stored as the raw wikitext of a page and read
//! through `index.php?action=raw`. The request is unauthenticated and uses
//! the blocking reqwest client; async callers run it on Tokio's blocking pool
//! with `spawn_blocking`.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Errors raised while fetching a page from the wiki.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WikiError {
    /// The HTTP client could not be configured.
    #[error("failed to configure wiki HTTP client: {message}")]
    Client {
        /// Builder error detail.
        message: String,
    },

    /// The request did not complete.
    #[error("wiki request failed: {message}")]
    Network {
        /// Transport error detail.
        message: String,
    },

    /// The wiki answered with a non-success status.
    #[error("wiki returned status {status} for page {title}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested page title.
        title: String,
    },

    /// The page content is not valid JSON.
    #[error("page {title} does not contain valid JSON: {message}")]
    InvalidJson {
        /// Requested page title.
        title: String,
        /// Parser error detail.
        message: String,
    },
}

/// Reads raw page content from a MediaWiki `index.php` endpoint.
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    index_url: String,
    timeout: Duration,
}

impl MediaWikiClient {
    /// Creates a client for the given `index.php` URL.
    #[must_use]
    pub fn new(index_url: impl Into<String>) -> Self {
        Self {
            index_url: index_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Fetches a page and parses its raw content as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError`] when the request fails, the page is missing, or
    /// the content is not JSON.
    pub fn fetch_json(&self, title: &str) -> Result<serde_json::Value, WikiError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|error| WikiError::Client {
                message: error.to_string(),
            })?;

        tracing::debug!(index = %self.index_url, title, "fetching wiki page");
        let response = client
            .get(self.index_url.as_str())
            .query(&[("action", "raw"), ("title", title)])
            .send()
            .map_err(|error| WikiError::Network {
                message: error.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(WikiError::Status {
                status: response.status().as_u16(),
                title: title.to_owned(),
            });
        }

        let body = response.text().map_err(|error| WikiError::Network {
            message: error.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|error| WikiError::InvalidJson {
            title: title.to_owned(),
            message: error.to_string(),
        })
    }
}
