//! Locates the previous release and the commits made since it

use crate::boundary::BoundaryWarning;
use crate::domain::{Commit, Tag, TagPattern};
use crate::error::Result;
use crate::provider::RepositoryProvider;

/// Commits fetched for a release, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRange {
    pub commits: Vec<Commit>,
    /// True when the range was limited by the tag commit's author date. The
    /// tag commit itself is then normally the last element.
    pub bounded: bool,
}

/// First tag in provider order named `{prefix}MAJOR.MINOR.PATCH`
pub fn find_latest_version_tag(tags: &[Tag], prefix: &str) -> Result<Option<Tag>> {
    let pattern = TagPattern::new(prefix)?;
    Ok(tags.iter().find(|t| pattern.matches(&t.name)).cloned())
}

/// Reads tags and commit history from a provider
pub struct ReleaseResolver<'a, P: RepositoryProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: RepositoryProvider + ?Sized> ReleaseResolver<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        ReleaseResolver { provider }
    }

    /// List the provider's tags and pick the latest version tag
    pub async fn latest_tag(&self, prefix: &str) -> Result<Option<Tag>> {
        let tags = self.provider.list_tags().await?;
        let tag = find_latest_version_tag(&tags, prefix)?;

        match &tag {
            Some(tag) => log::debug!("resolver: latest version tag {} of {}", tag.name, tags.len()),
            None => log::debug!("resolver: no version tag among {} tags", tags.len()),
        }
        Ok(tag)
    }

    /// Commits authored at or after the tag's commit, or the full history.
    ///
    /// A tag whose commit is missing or undated falls back to the full history.
    pub async fn commits_since_tag(&self, tag: Option<&Tag>) -> Result<CommitRange> {
        let since = match tag {
            Some(tag) => match self.provider.get_commit(&tag.commit_sha).await? {
                Some(commit) => {
                    if commit.author_date.is_none() {
                        BoundaryWarning::TagCommitUndated {
                            tag: tag.name.clone(),
                            commit_sha: tag.commit_sha.clone(),
                        }
                        .report();
                    }
                    commit.author_date
                }
                None => {
                    BoundaryWarning::TagCommitNotFound {
                        tag: tag.name.clone(),
                        commit_sha: tag.commit_sha.clone(),
                    }
                    .report();
                    None
                }
            },
            None => None,
        };

        let commits = self.provider.list_commits(since).await?;
        Ok(CommitRange {
            commits,
            bounded: since.is_some(),
        })
    }
}
