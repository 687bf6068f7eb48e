//! Release workflow
//!
//! Resolves the latest version tag, reads the commits made since it,
//! classifies their messages, computes the next version, and creates a
//! release when a bump is called for. At most one release is created per run.

use crate::actions::{OutputSink, StateStore};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::conventional::{build_changelog, classify, normalize_message};
use crate::domain::{Commit, ReleaseRecord, Tag, Version, VersionBump};
use crate::error::Result;
use crate::provider::RepositoryProvider;
use crate::resolver::ReleaseResolver;
use std::fmt;

/// Workflow stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TagResolved,
    CommitsFetched,
    Classified,
    VersionComputed,
    Published,
    Skipped,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::TagResolved => "tag-resolved",
            Stage::CommitsFetched => "commits-fetched",
            Stage::Classified => "classified",
            Stage::VersionComputed => "version-computed",
            Stage::Published => "published",
            Stage::Skipped => "skipped",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Previous version as a tag, e.g. `v1.0.0`
    pub old_version: String,
    /// Next version as a tag; empty when no bump was called for
    pub new_version: String,
    /// Whether a release was created
    pub released: bool,
    pub bump: VersionBump,
    /// Normalized messages of the commits since the previous release
    pub messages: Vec<String>,
    /// The release request, when a bump was called for
    pub release: Option<ReleaseRecord>,
}

/// Release state read back by a later step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRelease {
    pub new_version: String,
    pub released: bool,
    pub messages: Vec<String>,
}

impl ReleaseOutcome {
    /// Write `old-version`, `new-version`, and `released`
    pub fn emit(&self, sink: &mut dyn OutputSink) -> Result<()> {
        sink.set_output("old-version", &self.old_version)?;
        sink.set_output("new-version", &self.new_version)?;
        sink.set_output("released", if self.released { "true" } else { "false" })?;
        Ok(())
    }

    /// Save the outcome for a later step
    pub fn persist(&self, store: &mut dyn StateStore) -> Result<()> {
        store.save("new-version", &self.new_version)?;
        store.save("released", if self.released { "true" } else { "false" })?;
        store.save("messages", &serde_json::to_string(&self.messages)?)?;
        Ok(())
    }

    /// Read back a persisted outcome. `Ok(None)` when nothing was saved.
    pub fn restore(store: &dyn StateStore) -> Result<Option<SavedRelease>> {
        let Some(new_version) = store.load("new-version")? else {
            return Ok(None);
        };
        let released = store.load("released")?.as_deref() == Some("true");
        let messages = match store.load("messages")? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        Ok(Some(SavedRelease {
            new_version,
            released,
            messages,
        }))
    }
}

/// Drives one release run against a provider
pub struct SemverRelease<'a, P: RepositoryProvider + ?Sized> {
    config: Config,
    provider: &'a P,
}

impl<'a, P: RepositoryProvider + ?Sized> SemverRelease<'a, P> {
    pub fn new(config: Config, provider: &'a P) -> Self {
        SemverRelease { config, provider }
    }

    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let config = &self.config;
        let resolver = ReleaseResolver::new(self.provider);
        let stage = Stage::Start;

        let tag = resolver.latest_tag(&config.tag_prefix).await?;
        let stage = advance(stage, Stage::TagResolved);

        let range = resolver.commits_since_tag(tag.as_ref()).await?;
        let mut commits = range.commits;
        match tag.as_ref().filter(|_| range.bounded) {
            Some(tag) => drop_tag_commit(&mut commits, tag),
            None if config.drop_oldest_without_tag => {
                if let Some(oldest) = commits.pop() {
                    log::debug!("dropping oldest commit {}", oldest.short_sha());
                }
            }
            None => {}
        }
        let stage = advance(stage, Stage::CommitsFetched);

        let messages: Vec<String> = commits
            .iter()
            .map(|c| normalize_message(&c.message))
            .collect();
        let bump = classify(&messages);
        log::info!("{} commits since last release, bump: {}", messages.len(), bump);
        let stage = advance(stage, Stage::Classified);

        let old = self.previous_version(tag.as_ref().map(|t| t.name.as_str()))?;
        let old_version = old.format(&config.tag_prefix);
        log::info!("last version: {}", old_version);

        let new = old.bump(bump)?;
        let stage = advance(stage, Stage::VersionComputed);

        if !new.is_bumped() {
            log::info!("no new version");
            advance(advance(stage, Stage::Skipped), Stage::Done);
            return Ok(ReleaseOutcome {
                old_version,
                new_version: String::new(),
                released: false,
                bump,
                messages,
                release: None,
            });
        }

        let new_version = new.format(&config.tag_prefix);
        let record = ReleaseRecord::new(
            new_version.clone(),
            config.target_branch.clone(),
            build_changelog(&messages),
        );

        let stage = if config.dry_run {
            log::info!("dry run: would create release {}", new_version);
            advance(stage, Stage::Skipped)
        } else {
            log::info!("new version: {}, creating release", new_version);
            let response = self.provider.create_release(&record).await?;
            if let Some(url) = response.and_then(|r| r.html_url) {
                log::info!("release published: {}", url);
            }
            advance(stage, Stage::Published)
        };
        let released = stage == Stage::Published;
        advance(stage, Stage::Done);

        Ok(ReleaseOutcome {
            old_version,
            new_version,
            released,
            bump,
            messages,
            release: Some(record),
        })
    }

    fn previous_version(&self, tag: Option<&str>) -> Result<Version> {
        let config = &self.config;
        match tag {
            Some(name) => match Version::parse_tag(name, &config.tag_prefix) {
                Some(version) => Ok(version),
                None => {
                    BoundaryWarning::UnparsableTag {
                        tag: name.to_string(),
                        init_version: config.init_version.clone(),
                    }
                    .report();
                    Version::parse_init(&config.init_version)
                }
            },
            None => {
                BoundaryWarning::NoVersionTag {
                    prefix: config.tag_prefix.clone(),
                    init_version: config.init_version.clone(),
                }
                .report();
                Version::parse_init(&config.init_version)
            }
        }
    }
}

/// Remove the previous release's own commit from a range bounded by its date.
/// A truncated history may not reach it, in which case nothing is dropped.
fn drop_tag_commit(commits: &mut Vec<Commit>, tag: &Tag) {
    match commits.iter().rposition(|c| c.sha == tag.commit_sha) {
        Some(index) => {
            let boundary = commits.remove(index);
            log::debug!("dropping boundary commit {}", boundary.short_sha());
        }
        None => BoundaryWarning::TagCommitNotFetched {
            tag: tag.name.clone(),
            commit_sha: tag.commit_sha.clone(),
        }
        .report(),
    }
}

fn advance(from: Stage, to: Stage) -> Stage {
    log::debug!("stage: {} -> {}", from, to);
    to
}
