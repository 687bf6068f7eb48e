use crate::domain::{Commit, ReleaseRecord, ReleaseResponse, Tag};
use crate::error::{Result, SemverReleaseError};
use crate::provider::RepositoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock provider for testing without network or git access
#[derive(Default)]
pub struct MockProvider {
    tags: Vec<Tag>,
    commits: Vec<Commit>,
    lookups: HashMap<String, Commit>,
    fail_create: bool,
    releases: Mutex<Vec<ReleaseRecord>>,
    since_requests: Mutex<Vec<Option<DateTime<Utc>>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag, keeping insertion order as list order
    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Append a commit to the history, newest first
    pub fn add_commit(&mut self, commit: Commit) {
        self.commits.push(commit);
    }

    /// Register a commit returned by `get_commit` without adding it to the history
    pub fn add_lookup(&mut self, commit: Commit) {
        self.lookups.insert(commit.sha.clone(), commit);
    }

    /// Make `create_release` fail as a non-success status would
    pub fn fail_create_release(&mut self) {
        self.fail_create = true;
    }

    /// Releases created so far
    pub fn releases(&self) -> Vec<ReleaseRecord> {
        self.releases.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The `since` bound of every `list_commits` call so far
    pub fn since_requests(&self) -> Vec<Option<DateTime<Utc>>> {
        self.since_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RepositoryProvider for MockProvider {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    async fn list_commits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Commit>> {
        if let Ok(mut requests) = self.since_requests.lock() {
            requests.push(since);
        }

        Ok(self
            .commits
            .iter()
            .filter(|c| match (since, c.author_date) {
                (Some(since), Some(date)) => date >= since,
                _ => true,
            })
            .cloned()
            .collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<Option<Commit>> {
        Ok(self
            .lookups
            .get(sha)
            .or_else(|| self.commits.iter().find(|c| c.sha == sha))
            .cloned())
    }

    async fn create_release(&self, record: &ReleaseRecord) -> Result<Option<ReleaseResponse>> {
        if self.fail_create {
            return Err(SemverReleaseError::provider(format!(
                "could not create release {}: status 422",
                record.tag_name
            )));
        }

        let mut releases = self
            .releases
            .lock()
            .map_err(|_| SemverReleaseError::provider("mock release log poisoned"))?;
        releases.push(record.clone());

        Ok(Some(ReleaseResponse {
            id: Some(releases.len() as u64),
            html_url: None,
            tag_name: Some(record.tag_name.clone()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_mock_filters_commits_by_since() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let mut mock = MockProvider::new();
        mock.add_commit(Commit::new("new", "feat: x").with_author_date(t1));
        mock.add_commit(Commit::new("old", "init").with_author_date(t0));

        let all = mock.list_commits(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let since = mock.list_commits(Some(t1)).await.unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].sha, "new");

        assert_eq!(mock.since_requests(), vec![None, Some(t1)]);
    }

    #[tokio::test]
    async fn test_mock_get_commit_prefers_lookup() {
        let mut mock = MockProvider::new();
        mock.add_lookup(Commit::new("abc", "release"));

        assert!(mock.get_commit("abc").await.unwrap().is_some());
        assert!(mock.get_commit("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_records_releases() {
        let mock = MockProvider::new();
        let record = ReleaseRecord::new("v1.0.0", "master", "body");

        let response = mock.create_release(&record).await.unwrap().unwrap();
        assert_eq!(response.tag_name.as_deref(), Some("v1.0.0"));
        assert_eq!(mock.releases(), vec![record]);
    }

    #[tokio::test]
    async fn test_mock_create_release_failure() {
        let mut mock = MockProvider::new();
        mock.fail_create_release();

        let record = ReleaseRecord::new("v1.0.0", "master", "body");
        assert!(mock.create_release(&record).await.is_err());
        assert!(mock.releases().is_empty());
    }
}
