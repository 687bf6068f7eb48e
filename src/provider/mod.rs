//! Repository-data provider abstraction
//!
//! The release engine reads tags and commits and creates releases through the
//! [RepositoryProvider] trait. Implementations:
//!
//! - [github::GitHubClient]: the GitHub REST API, used in CI
//! - [local::LocalRepository]: a local checkout via `git2`, for offline and dry runs
//! - [mock::MockProvider]: an in-memory provider for tests
//!
//! Providers return commits newest-first and tags in their natural list
//! order, which callers treat as authoritative.

pub mod github;
pub mod local;
pub mod mock;

pub use github::GitHubClient;
pub use local::LocalRepository;
pub use mock::MockProvider;

use crate::domain::{Commit, ReleaseRecord, ReleaseResponse, Tag};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// List tags in provider order (assumed newest-first)
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// List commits newest-first, limited to author dates at or after `since`
    async fn list_commits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Commit>>;

    /// Look up a single commit. `Ok(None)` means not found.
    async fn get_commit(&self, sha: &str) -> Result<Option<Commit>>;

    /// Create a release. Any non-success status is an error.
    async fn create_release(&self, record: &ReleaseRecord) -> Result<Option<ReleaseResponse>>;
}
