//! One-way synchronisation of GitHub pull requests into Gerrit.
//!
//! For every tracked repository the library keeps a local clone, lists the
//! open pull requests, squashes each pull request's patch series into a single
//! commit and pushes it to Gerrit for review. A `SQLite` content store maps
//! each pull request's patch URL to the Gerrit Change-Id it was given, so
//! later runs push new patch sets to the same change and skip pull requests
//! whose content has not changed.

pub mod config;
pub mod error;
pub mod github;
pub mod persistence;
pub mod reconcile;
pub mod sync;
pub mod telemetry;
pub mod types;
pub mod wiki;
pub mod workspace;

pub use config::{GitHubCredentials, RemoteConfigOverlay, SyncConfig};
pub use error::SyncError;
pub use github::{ForgeError, ForgeGateway, OctocrabForgeGateway, PullRequest};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use sync::{RunSummary, SyncBot, SyncParts};
pub use types::{ChangeId, ContentHash, PatchUrl};
pub use wiki::MediaWikiClient;
pub use workspace::{GitOperations, SystemGit, WorkspaceManager, WorkspaceState};
