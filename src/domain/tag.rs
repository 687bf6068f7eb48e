use crate::error::Result;
use regex::Regex;

/// A tag as listed by the repository provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// Matches version tags of the form `{prefix}MAJOR.MINOR.PATCH`
///
/// Anchored at the start only, so `v1.2.3-rc.1` matches prefix `v`.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    pub fn new(prefix: &str) -> Result<Self> {
        let regex = Regex::new(&format!(r"^{}\d+\.\d+\.\d+", regex::escape(prefix)))?;
        Ok(TagPattern { regex })
    }

    pub fn matches(&self, tag_name: &str) -> bool {
        self.regex.is_match(tag_name)
    }
}
