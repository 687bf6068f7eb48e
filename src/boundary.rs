use std::fmt;

/// Non-fatal conditions met while resolving the previous release.
/// Reported to the user; the run continues with a fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag matches the configured prefix
    NoVersionTag { prefix: String, init_version: String },
    /// The tag's commit could not be found
    TagCommitNotFound { tag: String, commit_sha: String },
    /// The tag's commit carries no author date
    TagCommitUndated { tag: String, commit_sha: String },
    /// The tag's commit is missing from the fetched history, e.g. after the page limit
    TagCommitNotFetched { tag: String, commit_sha: String },
    /// Tag matched the pattern but is not a semantic version
    UnparsableTag { tag: String, init_version: String },
}

fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag {
                prefix,
                init_version,
            } => write!(
                f,
                "No tag matching '{}X.Y.Z' found, starting from {}",
                prefix, init_version
            ),
            BoundaryWarning::TagCommitNotFound { tag, commit_sha } => write!(
                f,
                "Commit {} of tag '{}' not found, reading full history",
                short(commit_sha),
                tag
            ),
            BoundaryWarning::TagCommitUndated { tag, commit_sha } => write!(
                f,
                "Commit {} of tag '{}' has no author date, reading full history",
                short(commit_sha),
                tag
            ),
            BoundaryWarning::TagCommitNotFetched { tag, commit_sha } => write!(
                f,
                "Commit {} of tag '{}' is not in the fetched history, keeping every commit",
                short(commit_sha),
                tag
            ),
            BoundaryWarning::UnparsableTag { tag, init_version } => write!(
                f,
                "Cannot parse tag '{}' as a semantic version, using {}",
                tag, init_version
            ),
        }
    }
}

impl BoundaryWarning {
    /// Emit through the `log` facade
    pub fn report(&self) {
        log::warn!("{}", self);
    }
}
