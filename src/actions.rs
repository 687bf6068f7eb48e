//! Step inputs, outputs, and cross-step state
//!
//! In CI the runner passes inputs as `INPUT_<NAME>` environment variables and
//! collects outputs and saved state from the files named by `GITHUB_OUTPUT`
//! and `GITHUB_STATE`. Saved state comes back to later steps as `STATE_<key>`.

use crate::error::{Result, SemverReleaseError};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key/value configuration inputs. Empty values are reported as absent.
pub trait InputSource {
    fn input(&self, name: &str) -> Option<String>;
}

/// Destination for the run's outputs
pub trait OutputSink {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()>;
}

/// State handed from one step invocation to a later one
pub trait StateStore {
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
    fn load(&self, key: &str) -> Result<Option<String>>;
}

/// Runner-backed inputs, outputs, and state
#[derive(Debug, Default)]
pub struct ActionsRuntime {
    output_file: Option<PathBuf>,
    state_file: Option<PathBuf>,
    saved: HashMap<String, String>,
}

impl ActionsRuntime {
    /// Use the files named by `GITHUB_OUTPUT` and `GITHUB_STATE`, if set
    pub fn from_env() -> Self {
        let non_empty = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        ActionsRuntime {
            output_file: non_empty("GITHUB_OUTPUT"),
            state_file: non_empty("GITHUB_STATE"),
            saved: HashMap::new(),
        }
    }

    pub fn with_files(output_file: Option<PathBuf>, state_file: Option<PathBuf>) -> Self {
        ActionsRuntime {
            output_file,
            state_file,
            saved: HashMap::new(),
        }
    }

    /// Environment variable name carrying an input, e.g. `INPUT_TAG-PREFIX`
    pub fn input_variable(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for ActionsRuntime {
    fn input(&self, name: &str) -> Option<String> {
        std::env::var(Self::input_variable(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl OutputSink for ActionsRuntime {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        log::debug!("output: {} = {}", key, value);

        match &self.output_file {
            Some(path) => append_command(path, key, value),
            None => {
                println!("{}={}", key, value);
                Ok(())
            }
        }
    }
}

impl StateStore for ActionsRuntime {
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        log::debug!("state: {} = {}", key, value);

        if let Some(path) = &self.state_file {
            append_command(path, key, value)?;
        }
        self.saved.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.saved.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(std::env::var(format!("STATE_{}", key))
            .ok()
            .filter(|v| !v.is_empty()))
    }
}

/// Append `key<<delimiter` / value / `delimiter` to a runner command file
fn append_command(path: &Path, key: &str, value: &str) -> Result<()> {
    let delimiter = command_delimiter();
    if key.contains(&delimiter) || value.contains(&delimiter) {
        return Err(SemverReleaseError::config(format!(
            "Value for '{}' contains the command delimiter",
            key
        )));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}<<{}", key, delimiter)?;
    writeln!(file, "{}", value)?;
    writeln!(file, "{}", delimiter)?;
    Ok(())
}

fn command_delimiter() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}

/// In-memory inputs, outputs, and state
#[derive(Debug, Default, Clone)]
pub struct MemoryRuntime {
    inputs: HashMap<String, String>,
    outputs: Vec<(String, String)>,
    state: HashMap<String, String>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inputs.insert(name.into(), value.into());
    }

    /// Most recent value written for an output key
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every output write, in order
    pub fn outputs(&self) -> &[(String, String)] {
        &self.outputs
    }
}

impl InputSource for MemoryRuntime {
    fn input(&self, name: &str) -> Option<String> {
        self.inputs
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl OutputSink for MemoryRuntime {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        self.outputs.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

impl StateStore for MemoryRuntime {
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.state.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.get(key).cloned())
    }
}
