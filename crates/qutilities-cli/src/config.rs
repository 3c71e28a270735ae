//! Settings file and environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the settings file,
//! `QUTIL_*` environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::commands::common::OutputFormat;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "QUTIL_LOG";
/// Environment variable overriding the output format.
pub const FORMAT_ENV: &str = "QUTIL_FORMAT";

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Tracing filter, e.g. `info` or `qutilities_synth=debug`.
    pub log_level: Option<String>,
    /// Default output format.
    pub format: Option<OutputFormat>,
    /// Default shot count for `--run`.
    pub shots: Option<u32>,
    /// Default seed for random oracle and base choices.
    pub seed: Option<u64>,
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields defaults; a missing explicit file is
    /// an error. Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env(
            std::env::var(LOG_ENV).ok(),
            std::env::var(FORMAT_ENV).ok(),
        )?;
        Ok(settings)
    }

    /// Parse a YAML settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn apply_env(&mut self, log: Option<String>, format: Option<String>) -> Result<()> {
        if let Some(log) = log.filter(|s| !s.is_empty()) {
            self.log_level = Some(log);
        }
        if let Some(format) = format.filter(|s| !s.is_empty()) {
            let parsed = format
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{FORMAT_ENV}: {e}"))?;
            self.format = Some(parsed);
        }
        Ok(())
    }

    /// Tracing filter for the given `-v` count.
    pub fn log_filter(&self, verbose: u8) -> String {
        match verbose {
            0 => self.log_level.clone().unwrap_or_else(|| "warn".into()),
            1 => "info".into(),
            2 => "debug".into(),
            _ => "trace".into(),
        }
    }
}

/// `~/.qutilities/config.yaml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qutilities").join("config.yaml"))
}
