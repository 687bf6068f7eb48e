use chrono::{DateTime, Utc};

/// A commit as returned by the repository provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author_date: Option<DateTime<Utc>>,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Commit {
            sha: sha.into(),
            message: message.into(),
            author_date: None,
        }
    }

    pub fn with_author_date(mut self, date: DateTime<Utc>) -> Self {
        self.author_date = Some(date);
        self
    }

    /// First seven characters of the sha, for display
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
