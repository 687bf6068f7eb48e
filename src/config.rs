use crate::actions::InputSource;
use crate::domain::Version;
use crate::error::{Result, SemverReleaseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Release settings for a single run.
///
/// Built from defaults, an optional TOML file, step inputs, and CLI flags, in
/// increasing order of precedence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Version assumed when no matching tag exists
    #[serde(default = "default_init_version")]
    pub init_version: String,

    /// Prefix stripped from tag names when parsing and prepended when formatting
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Branch the created release points at
    #[serde(default = "default_target_branch")]
    pub target_branch: String,

    /// Drop the oldest fetched commit even when no tag bounded the range
    #[serde(default)]
    pub drop_oldest_without_tag: bool,

    /// Compute everything but do not create the release
    #[serde(default)]
    pub dry_run: bool,
}

fn default_init_version() -> String {
    "0.0.0".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_target_branch() -> String {
    "master".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            init_version: default_init_version(),
            tag_prefix: default_tag_prefix(),
            target_branch: default_target_branch(),
            drop_oldest_without_tag: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Override settings with the step's key/value inputs.
    ///
    /// Keys match the file keys (`init-version`, `tag-prefix`, ...). Empty
    /// inputs count as unset.
    pub fn apply_inputs(&mut self, inputs: &dyn InputSource) -> Result<()> {
        if let Some(value) = inputs.input("init-version") {
            self.init_version = value;
        }
        if let Some(value) = inputs.input("tag-prefix") {
            self.tag_prefix = value;
        }
        if let Some(value) = inputs.input("target-branch") {
            self.target_branch = value;
        }
        if let Some(value) = inputs.input("drop-oldest-without-tag") {
            self.drop_oldest_without_tag = parse_bool("drop-oldest-without-tag", &value)?;
        }
        if let Some(value) = inputs.input("dry-run") {
            self.dry_run = parse_bool("dry-run", &value)?;
        }
        Ok(())
    }

    /// Reject settings that would only fail later, before any network call
    pub fn validate(&self) -> Result<()> {
        Version::parse_init(&self.init_version)
            .map_err(|e| SemverReleaseError::config(format!("init-version: {}", e)))?;

        if self.target_branch.trim().is_empty() {
            return Err(SemverReleaseError::config("target-branch must not be empty"));
        }

        Ok(())
    }
}

/// Accepts the YAML 1.2 core boolean spellings used by workflow inputs
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(SemverReleaseError::config(format!(
            "Input '{}' must be true or false, got '{}'",
            key, other
        ))),
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semver-release.toml` in current directory
/// 3. `.semver-release.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./semver-release.toml").exists() {
        fs::read_to_string("./semver-release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".semver-release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| SemverReleaseError::config(format!("Invalid config file: {}", e)))
}

/// Identity and credentials of the hosted repository
#[derive(Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    pub credential: String,
    pub api_url: String,
}

impl RepositoryConfig {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        RepositoryConfig {
            owner: owner.into(),
            name: name.into(),
            credential: credential.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `GITHUB_REPOSITORY`, `GITHUB_TOKEN`, and `GITHUB_API_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let repository = lookup("GITHUB_REPOSITORY")
            .ok_or_else(|| SemverReleaseError::config("env var GITHUB_REPOSITORY not found"))?;
        let (owner, name) = parse_repository(&repository)?;

        let credential = lookup("GITHUB_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SemverReleaseError::config("env var GITHUB_TOKEN not found"))?;

        let config = RepositoryConfig::new(owner, name, credential);
        Ok(match lookup("GITHUB_API_URL").filter(|u| !u.is_empty()) {
            Some(url) => config.with_api_url(url),
            None => config,
        })
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("credential", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Split an `owner/name` repository identifier
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(SemverReleaseError::config(format!(
            "env var GITHUB_REPOSITORY contains invalid repository value '{}'",
            repository
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::MemoryRuntime;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.init_version, "0.0.0");
        assert_eq!(config.tag_prefix, "v");
        assert_eq!(config.target_branch, "master");
        assert!(!config.drop_oldest_without_tag);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("tag-prefix = \"release-\"").unwrap();
        assert_eq!(config.tag_prefix, "release-");
        assert_eq!(config.init_version, "0.0.0");
    }

    #[test]
    fn test_apply_inputs_overrides() {
        let mut inputs = MemoryRuntime::new();
        inputs.set_input("init-version", "1.0.0");
        inputs.set_input("tag-prefix", "");
        inputs.set_input("dry-run", "true");

        let mut config = Config::default();
        config.apply_inputs(&inputs).unwrap();

        assert_eq!(config.init_version, "1.0.0");
        assert_eq!(config.tag_prefix, "v");
        assert!(config.dry_run);
    }

    #[test]
    fn test_apply_inputs_rejects_bad_bool() {
        let mut inputs = MemoryRuntime::new();
        inputs.set_input("dry-run", "yes");

        let err = Config::default().apply_inputs(&inputs).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_bad_init_version() {
        let config = Config {
            init_version: "one".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("init-version"));
    }

    #[test]
    fn test_repository_config_from_lookup() {
        let config = RepositoryConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("GITHUB_TOKEN", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.owner, "octo");
        assert_eq!(config.name, "widgets");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.slug(), "octo/widgets");
    }

    #[test]
    fn test_repository_config_api_url_override() {
        let config = RepositoryConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("GITHUB_TOKEN", "secret"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_repository_config_missing_values() {
        let err = RepositoryConfig::from_lookup(lookup(&[("GITHUB_TOKEN", "secret")]))
            .unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));

        let err = RepositoryConfig::from_lookup(lookup(&[("GITHUB_REPOSITORY", "octo/widgets")]))
            .unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_parse_repository_invalid() {
        assert!(parse_repository("no-slash").is_err());
        assert!(parse_repository("/name").is_err());
        assert!(parse_repository("owner/").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = RepositoryConfig::new("octo", "widgets", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("redacted"));
    }
}
