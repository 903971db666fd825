//! GitHub pull request intake.
//!
//! This module wraps Octocrab to list a repository's open pull requests,
//! download their patch rendering, resolve submitter identities, and post the
//! hand-off comment. Errors are mapped into [`ForgeError`] variants so callers
//! can surface precise failures without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::ForgeError;
pub use gateway::{ForgeGateway, OctocrabForgeGateway};
pub use locator::{RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{AuthorIdentity, PullRequest};

#[cfg(test)]
pub use gateway::MockForgeGateway;
