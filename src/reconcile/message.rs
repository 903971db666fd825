//! Commit message composition for imported pull requests.

use crate::github::PullRequest;
use crate::types::ChangeId;

use super::trailers::{Trailer, TrailerKey, split_trailers};

/// Builds the squashed commit's message.
///
/// The layout is the pull request title, its description with any trailing
/// trailer block removed, a `Closes <url>` paragraph, and a final paragraph
/// holding only trailers: the description's `Bug:` lines and, for an update,
/// the stored Change-Id. Keeping the trailers in a paragraph of their own lets
/// `git interpret-trailers` (and so Gerrit's `commit-msg` hook) see them.
/// Change-Id trailers written into the description are discarded; the stored
/// identifier is the only one that may reach Gerrit.
#[must_use]
pub fn compose(pull_request: &PullRequest, change_id: Option<&ChangeId>) -> String {
    let parsed = split_trailers(&pull_request.body);

    let mut message = String::new();
    message.push_str(pull_request.title.trim());
    message.push_str("\n\n");

    if !parsed.text.trim().is_empty() {
        message.push_str(&parsed.text);
        message.push_str("\n\n");
    }

    message.push_str("Closes ");
    message.push_str(&pull_request.html_url);
    message.push('\n');

    let stored = change_id.map(|id| Trailer {
        key: TrailerKey::ChangeId,
        value: id.as_str().to_owned(),
    });
    let footer: Vec<String> = parsed
        .trailers_with(TrailerKey::Bug)
        .chain(stored.as_ref())
        .map(ToString::to_string)
        .collect();

    if !footer.is_empty() {
        message.push('\n');
        for line in footer {
            message.push_str(&line);
            message.push('\n');
        }
    }

    message
}
