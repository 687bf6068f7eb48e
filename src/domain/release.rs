use serde::{Deserialize, Serialize};

/// Release creation request sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRecord {
    /// Build a published (non-draft, non-prerelease) release titled after its tag
    pub fn new(tag: impl Into<String>, target: impl Into<String>, body: impl Into<String>) -> Self {
        let tag = tag.into();
        ReleaseRecord {
            name: tag.clone(),
            tag_name: tag,
            target_commitish: target.into(),
            body: body.into(),
            draft: false,
            prerelease: false,
        }
    }
}

/// The fields of a created release this tool reads back
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
}
