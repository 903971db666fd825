//! Identifier newtypes shared by the store, the engine, and the forge client.
//!
//! Patch URLs, Change-Ids, and content digests are all plain strings on the
//! wire; wrapping them keeps the store's `(url, changeid, repo, hash)` columns
//! from being mixed up at call sites.

use std::fmt;

use sha2::{Digest, Sha256};

/// Canonical URL of a pull request's `.patch` content.
///
/// This is the primary key of the content store and stays stable across
/// re-fetches of the same pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatchUrl(String);

impl PatchUrl {
    /// Creates a new `PatchUrl` from a string.
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self(url)
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final path segment (e.g. `12.patch`), used as the local
    /// file name for the downloaded patch.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("pull.patch")
    }
}

impl fmt::Display for PatchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PatchUrl {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PatchUrl {
    fn from(s: &str) -> Self {
        Self::new(s.to_owned())
    }
}

/// Gerrit Change-Id (`I` followed by 40 hex characters in practice).
///
/// Assigned once by the code-review tooling and reused for every later
/// patch set of the same pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeId(String);

impl ChangeId {
    /// Creates a new `ChangeId` from a string.
    #[must_use]
    pub const fn new(change_id: String) -> Self {
        Self(change_id)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ChangeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ChangeId {
    fn from(s: &str) -> Self {
        Self::new(s.to_owned())
    }
}

/// Hex-encoded SHA-256 digest of downloaded patch content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Digests `content` and returns its lowercase hex encoding.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(content)))
    }

    /// Placeholder stored for a change whose first push has not succeeded.
    ///
    /// It never equals a real digest, so the pull request is processed again.
    #[must_use]
    pub const fn pending() -> Self {
        Self(String::new())
    }

    /// Wraps an already-computed digest, as read back from the store.
    #[must_use]
    pub const fn from_hex(digest: String) -> Self {
        Self(digest)
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ContentHash, PatchUrl};

    #[rstest]
    #[case::github_patch("https://github.com/acme/foo/pull/12.patch", "12.patch")]
    #[case::trailing_slash("https://example.org/p/7.patch/", "7.patch")]
    #[case::bare_host("https://example.org/", "example.org")]
    fn file_name_uses_last_path_segment(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(PatchUrl::from(url).file_name(), expected);
    }

    #[test]
    fn content_hash_is_stable_for_identical_content() {
        let first = ContentHash::of(b"From 1234 Mon Sep 17 00:00:00 2001\n");
        let second = ContentHash::of(b"From 1234 Mon Sep 17 00:00:00 2001\n");

        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64, "sha-256 hex digest is 64 chars");
    }

    #[test]
    fn pending_hash_never_matches_a_digest() {
        assert_ne!(ContentHash::pending(), ContentHash::of(b""));
    }

    #[test]
    fn content_hash_differs_when_content_changes() {
        assert_ne!(ContentHash::of(b"a"), ContentHash::of(b"b"));
    }
}
