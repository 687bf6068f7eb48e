use crate::domain::{Commit, ReleaseRecord, ReleaseResponse, Tag};
use crate::error::{Result, SemverReleaseError};
use crate::provider::RepositoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use git2::{ErrorCode, Oid, Repository, Signature, Sort};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Provider backed by a local git checkout.
///
/// Tags are listed newest tagged commit first. Creating a release writes an
/// annotated tag whose message holds the title and changelog.
pub struct LocalRepository {
    repo: Mutex<Repository>,
}

impl LocalRepository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository) -> Self {
        LocalRepository {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> Result<MutexGuard<'_, Repository>> {
        self.repo
            .lock()
            .map_err(|_| SemverReleaseError::provider("local repository lock poisoned"))
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    Commit {
        sha: commit.id().to_string(),
        message: commit.message().unwrap_or_default().to_string(),
        author_date: DateTime::<Utc>::from_timestamp(commit.author().when().seconds(), 0),
    }
}

#[async_trait]
impl RepositoryProvider for LocalRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let repo = self.repo()?;
        let names = repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    log::debug!("local: skipping tag '{}' not pointing at a commit: {}", name, e);
                    continue;
                }
            };
            tags.push((commit.time().seconds(), Tag::new(name, commit.id().to_string())));
        }

        tags.sort_by(|a, b| b.0.cmp(&a.0));
        log::debug!("local: found {} tags", tags.len());
        Ok(tags.into_iter().map(|(_, tag)| tag).collect())
    }

    async fn list_commits(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Commit>> {
        let repo = self.repo()?;
        if repo.is_empty()? {
            log::debug!("local: repository has no commits");
            return Ok(Vec::new());
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = to_commit(&repo.find_commit(oid?)?);
            let in_range = match (since, commit.author_date) {
                (Some(since), Some(date)) => date >= since,
                _ => true,
            };
            if in_range {
                commits.push(commit);
            }
        }

        log::debug!("local: found {} commits", commits.len());
        Ok(commits)
    }

    async fn get_commit(&self, sha: &str) -> Result<Option<Commit>> {
        let oid = match Oid::from_str(sha) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };

        let repo = self.repo()?;
        let found = match repo.find_commit(oid) {
            Ok(commit) => Ok(Some(to_commit(&commit))),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        };
        found
    }

    async fn create_release(&self, record: &ReleaseRecord) -> Result<Option<ReleaseResponse>> {
        let repo = self.repo()?;

        let branch_ref = format!("refs/heads/{}", record.target_commitish);
        let target = match repo.revparse_single(&branch_ref) {
            Ok(object) => object,
            Err(_) => {
                log::warn!(
                    "local: branch '{}' not found, tagging HEAD",
                    record.target_commitish
                );
                repo.revparse_single("HEAD")?
            }
        };
        let commit = target.peel_to_commit()?;

        let signature = match repo.signature() {
            Ok(signature) => signature,
            Err(_) => Signature::now("semver-release", "semver-release@localhost")?,
        };

        let message = format!("{}\n\n{}", record.name, record.body);
        repo.tag(&record.tag_name, commit.as_object(), &signature, &message, false)
            .map_err(|e| {
                SemverReleaseError::tag(format!("Cannot create tag '{}': {}", record.tag_name, e))
            })?;

        log::debug!("local: created tag {} at {}", record.tag_name, commit.id());
        Ok(Some(ReleaseResponse {
            id: None,
            html_url: None,
            tag_name: Some(record.tag_name.clone()),
        }))
    }
}
