//! GitHub REST API provider
//!
//! Responses are decoded into small fixed-shape records holding only the
//! fields the release engine consumes, then mapped onto the domain types.

use crate::config::RepositoryConfig;
use crate::domain::{Commit, ReleaseRecord, ReleaseResponse, Tag};
use crate::error::{Result, SemverReleaseError};
use crate::provider::RepositoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const PER_PAGE: usize = 100;
const DEFAULT_MAX_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
    commit: TagCommitResponse,
}

#[derive(Debug, Deserialize)]
struct TagCommitResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDataResponse,
}

#[derive(Debug, Deserialize)]
struct CommitDataResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<AuthorResponse>,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

impl From<TagResponse> for Tag {
    fn from(tag: TagResponse) -> Self {
        Tag::new(tag.name, tag.commit.sha)
    }
}

impl From<CommitResponse> for Commit {
    fn from(commit: CommitResponse) -> Self {
        Commit {
            sha: commit.sha,
            message: commit.commit.message,
            author_date: commit.commit.author.and_then(|a| a.date),
        }
    }
}

/// Client for the four repository operations the release engine needs
pub struct GitHubClient {
    client: Client,
    repository: RepositoryConfig,
    max_pages: usize,
}

impl GitHubClient {
    pub fn new(repository: RepositoryConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", repository.credential))
            .map_err(|_| SemverReleaseError::config("GITHUB_TOKEN contains invalid characters"))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        headers.insert(USER_AGENT, HeaderValue::from_static("semver-release"));

        let client = Client::builder().default_headers(headers).build()?;

        log::debug!(
            "github: creating client repository: {}, token: {}",
            repository.slug(),
            if repository.credential.is_empty() {
                "not present"
            } else {
                "present"
            }
        );

        Ok(GitHubClient {
            client,
            repository,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Upper bound on pages fetched by list operations
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.repository.api_url, self.repository.owner, self.repository.name, path
        )
    }

    /// Fetch consecutive pages until a short page or the page limit
    async fn get_paged<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();

        for page in 1..=self.max_pages {
            let response = self
                .client
                .get(url)
                .query(query)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                return Err(status_error(operation, url, status, &body));
            }

            let next: Vec<T> = response.json().await?;
            let count = next.len();
            log::debug!(
                "github: {}: {} items on page {}, {} so far",
                operation,
                count,
                page,
                items.len()
            );
            items.extend(next);

            if count < PER_PAGE {
                return Ok(items);
            }
        }

        log::warn!(
            "github: {}: stopped after {} pages, older entries were not fetched",
            operation,
            self.max_pages
        );
        Ok(items)
    }
}

fn status_error(operation: &str, url: &str, status: StatusCode, body: &str) -> SemverReleaseError {
    SemverReleaseError::provider(format!(
        "could not {}: status {} from {}, result: {}",
        operation,
        status.as_u16(),
        url,
        body
    ))
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        log::debug!("github: getting tags");
        let url = self.repo_url("tags");
        let tags: Vec<TagResponse> = self.get_paged("get tags", &url, &[]).await?;
        log::debug!("github: found {} tags", tags.len());
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn list_commits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Commit>> {
        log::debug!("github: getting commits since: {:?}", since);
        let url = self.repo_url("commits");
        let query: Vec<(&str, String)> = since
            .map(|s| ("since", s.to_rfc3339_opts(SecondsFormat::Secs, true)))
            .into_iter()
            .collect();
        let commits: Vec<CommitResponse> = self.get_paged("get commits", &url, &query).await?;
        log::debug!("github: found {} commits", commits.len());
        Ok(commits.into_iter().map(Commit::from).collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<Option<Commit>> {
        log::debug!("github: getting commit sha: {}", sha);
        let url = self.repo_url(&format!("commits/{}", sha));
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let commit: CommitResponse = response.json().await?;
                log::debug!("github: found commit sha: {}", commit.sha);
                Ok(Some(commit.into()))
            }
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                log::debug!("github: commit {} not found", sha);
                Ok(None)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(status_error("get commit", &url, status, &body))
            }
        }
    }

    async fn create_release(&self, record: &ReleaseRecord) -> Result<Option<ReleaseResponse>> {
        log::debug!("github: creating release with tag: {}", record.tag_name);
        let url = self.repo_url("releases");
        let response = self.client.post(&url).json(record).send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("create release", &url, status, &body));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}
