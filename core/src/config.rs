//! Configuration
//!
//! Engine settings are plain data handed to each evaluator. The CLI resolves
//! them (together with its own logging settings) from defaults, an optional
//! TOML file and `DERIVE_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "derive.toml";

/// Environment variable prefix, e.g. `DERIVE_ENGINE__STEP_LIMIT=10000`
pub const ENV_PREFIX: &str = "DERIVE";

/// Settings honored by both evaluators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of evaluator steps; `None` means unbounded
    pub step_limit: Option<u64>,

    /// Reject object responses whose tag the request did not declare
    pub check_response_tags: bool,
}

impl EngineConfig {
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn with_response_checks(mut self) -> Self {
        self.check_response_tags = true;
        self
    }
}

/// Full configuration of the `derive` binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,

    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            engine: EngineConfig::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Resolve configuration: defaults, then the config file, then environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p.to_path_buf()).required(true),
            None => config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Parse configuration from TOML text (no environment overlay)
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .context("Failed to parse configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
