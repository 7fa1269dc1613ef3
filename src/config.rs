//! `bump.toml` settings and command-line overrides.
//!
//! A config file names the files to bump, optional contexts, and either a
//! fixed `to` target or a list of `steps`. Everything is validated when the
//! config is turned into a [`BumpTask`], before any file is opened.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::{Operation, Pipeline};
use crate::rewrite::{BumpTask, Context, ContextError};
use crate::version::{Version, VersionError};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bump.toml";

/// Errors that may occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// A step names an unknown operation.
    #[error("Invalid step: {0}")]
    Step(#[from] VersionError),
    /// A context pattern does not compile.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Settings are inconsistent or incomplete.
    #[error("{0}")]
    Invalid(String),
}

/// Settings read from `bump.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BumpConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Built-in context names or regexes; empty means the defaults.
    #[serde(default)]
    pub contexts: Vec<String>,
    /// Fixed replacement for every version found.
    #[serde(default)]
    pub to: Option<String>,
    /// Operations such as `major` or `rc:2`, applied in order.
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default = "default_show_first_pre_counter")]
    pub show_first_pre_counter: bool,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            contexts: Vec::new(),
            to: None,
            steps: Vec::new(),
            show_first_pre_counter: default_show_first_pre_counter(),
        }
    }
}

fn default_show_first_pre_counter() -> bool {
    true
}

/// Values given on the command line; set fields win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Appended to the configured files.
    pub files: Vec<PathBuf>,
    /// Replace the configured contexts when non-empty.
    pub contexts: Vec<String>,
    pub to: Option<String>,
    /// Replace the configured steps when non-empty.
    pub steps: Vec<Operation>,
    pub show_first_pre_counter: Option<bool>,
}

impl BumpConfig {
    /// Parse config text; `path` is only used for error messages.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `bump.toml` from `dir` if it exists.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Apply command-line values on top of the file settings.
    ///
    /// A `to` override clears configured steps and vice versa.
    pub fn merge(mut self, overrides: Overrides) -> Self {
        self.files.extend(overrides.files);
        if !overrides.contexts.is_empty() {
            self.contexts = overrides.contexts;
        }
        if let Some(to) = overrides.to {
            self.to = Some(to);
            self.steps.clear();
        }
        if !overrides.steps.is_empty() {
            self.steps = overrides.steps.iter().map(ToString::to_string).collect();
            self.to = None;
        }
        if let Some(show) = overrides.show_first_pre_counter {
            self.show_first_pre_counter = show;
        }
        self
    }

    /// Build the pipeline described by `to` or `steps`.
    pub fn pipeline(&self) -> Result<Pipeline, ConfigError> {
        match (&self.to, self.steps.is_empty()) {
            (Some(_), false) => Err(ConfigError::Invalid(
                "`to` and `steps` cannot be combined".to_string(),
            )),
            (Some(target), true) => {
                if Version::parse(target).is_err() {
                    tracing::warn!("Target '{target}' does not look like a version");
                }
                Ok(Pipeline::fixed(target.clone()))
            }
            (None, false) => {
                let operations = self
                    .steps
                    .iter()
                    .map(|step| step.parse::<Operation>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Pipeline::steps(operations)
                    .with_show_first_pre_counter(self.show_first_pre_counter))
            }
            (None, true) => Err(ConfigError::Invalid(
                "Nothing to do: set a target version or at least one step".to_string(),
            )),
        }
    }

    /// Compile the configured contexts.
    pub fn contexts(&self) -> Result<Vec<Context>, ConfigError> {
        self.contexts
            .iter()
            .map(|context| Context::parse(context).map_err(ConfigError::from))
            .collect()
    }

    /// Validate everything and build the task.
    pub fn into_task(self) -> Result<BumpTask, ConfigError> {
        if self.files.is_empty() {
            return Err(ConfigError::Invalid("No files to bump".to_string()));
        }
        let pipeline = self.pipeline()?;
        let contexts = self.contexts()?;
        Ok(BumpTask::new(pipeline)
            .with_contexts(contexts)
            .with_files(self.files))
    }
}
