use crate::error::{Result, SemverReleaseError};
use std::fmt;

/// Semantic version plus a flag recording whether a bump was applied this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    inner: semver::Version,
    bumped: bool,
}

impl Version {
    /// Create a new, unbumped version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
            bumped: false,
        }
    }

    /// Resolve the current version from a tag name.
    ///
    /// `prefix` is stripped from `tag` when present. An absent or unparsable
    /// tag falls back to `init_version`, which must itself be valid.
    pub fn parse(tag: Option<&str>, init_version: &str, prefix: &str) -> Result<Self> {
        match tag.and_then(|t| Self::parse_tag(t, prefix)) {
            Some(version) => Ok(version),
            None => Self::parse_init(init_version),
        }
    }

    /// Parse a tag name, stripping `prefix` when present
    pub fn parse_tag(tag: &str, prefix: &str) -> Option<Self> {
        let text = tag.strip_prefix(prefix).unwrap_or(tag);
        match semver::Version::parse(text) {
            Ok(inner) => Some(Version::from(inner)),
            Err(e) => {
                log::debug!("tag '{}' is not a semantic version: {}", tag, e);
                None
            }
        }
    }

    /// Parse the configured initial version
    pub fn parse_init(init_version: &str) -> Result<Self> {
        semver::Version::parse(init_version)
            .map(Version::from)
            .map_err(|e| {
                SemverReleaseError::version(format!(
                    "Invalid initial version '{}': {}",
                    init_version, e
                ))
            })
    }

    pub fn bump_major(&self) -> Result<Self> {
        let major = increment(self.inner.major, "major", &self.inner)?;
        Ok(self.bumped_to(major, 0, 0))
    }

    pub fn bump_minor(&self) -> Result<Self> {
        let minor = increment(self.inner.minor, "minor", &self.inner)?;
        Ok(self.bumped_to(self.inner.major, minor, 0))
    }

    pub fn bump_patch(&self) -> Result<Self> {
        let patch = increment(self.inner.patch, "patch", &self.inner)?;
        Ok(self.bumped_to(self.inner.major, self.inner.minor, patch))
    }

    /// Apply a bump decision. `VersionBump::None` returns an unbumped copy.
    pub fn bump(&self, bump: VersionBump) -> Result<Self> {
        match bump {
            VersionBump::Major => self.bump_major(),
            VersionBump::Minor => self.bump_minor(),
            VersionBump::Patch => self.bump_patch(),
            VersionBump::None => Ok(self.clone()),
        }
    }

    pub fn is_bumped(&self) -> bool {
        self.bumped
    }

    /// Render as a tag name, e.g. `v1.2.3`
    pub fn format(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.inner)
    }

    /// A fresh release version: prerelease and build metadata are dropped
    fn bumped_to(&self, major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
            bumped: true,
        }
    }
}

fn increment(value: u64, component: &str, version: &semver::Version) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        SemverReleaseError::version(format!(
            "Cannot bump {} component of {}: value out of range",
            component, version
        ))
    })
}

impl From<semver::Version> for Version {
    fn from(inner: semver::Version) -> Self {
        Version {
            inner,
            bumped: false,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Version bump decision derived from commit messages.
///
/// Ordered `None < Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    None,
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::None => "none",
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
