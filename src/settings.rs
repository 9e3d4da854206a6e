//! # Settings Module
//!
//! ## Purpose
//! Keeps the user-tunable knobs of the puzzle tool in one JSON file
//! (`ckwatson_config.json` in the working directory by default).
//!
//! ## Configuration Format
//! ```json
//! {
//!   "strict_submission": false,
//!   "default_puzzle_name": "Untitled Puzzle",
//!   "default_energy": 250.0,
//!   "log_level": "info",
//!   "log_file": null
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust,no_run
//! use ckwatson::settings::Settings;
//!
//! let mut settings = Settings::new();
//! settings.set_strict_submission(true);
//! settings.save().unwrap();
//! ```
//! A missing file is not an error: defaults are used and the file is written on the first save.

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "ckwatson_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file '{path}' is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializable part of the settings.
///
/// # Fields
/// * `strict_submission` - run the strict formula parser over every balanced reaction before a puzzle is saved
/// * `default_puzzle_name` - placeholder name; while it is in place the name is derived from the species
/// * `default_energy` - energy pre-filled for every new species row
/// * `log_level` - one of off, error, warn, info, debug, trace
/// * `log_file` - optional file that receives a copy of the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub strict_submission: bool,
    pub default_puzzle_name: String,
    pub default_energy: f64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            strict_submission: false,
            default_puzzle_name: "Untitled Puzzle".to_string(),
            default_energy: 250.0,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Settings bound to the file they were loaded from.
#[derive(Debug, Clone)]
pub struct Settings {
    config: PuzzleConfig,
    config_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: PuzzleConfig::default(),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl Settings {
    /// Loads `ckwatson_config.json` from the working directory.
    /// If the file is absent or broken the defaults are used (a broken file is reported in the log).
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE).unwrap_or_else(|e| {
            warn!("{}; falling back to default settings", e);
            Self::default()
        })
    }

    /// Loads settings from a custom file. An absent file gives the defaults, a malformed one is an error.
    pub fn with_config_file(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.as_ref().to_path_buf();
        let config = Self::load_config(&config_file)?;
        Ok(Self {
            config,
            config_file,
        })
    }

    fn load_config(config_file: &Path) -> Result<PuzzleConfig, ConfigError> {
        if !config_file.exists() {
            return Ok(PuzzleConfig::default());
        }
        let content = fs::read_to_string(config_file).map_err(|source| ConfigError::Io {
            path: config_file.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: config_file.to_path_buf(),
            source,
        })?;
        info!("settings loaded from '{}'", config_file.display());
        Ok(config)
    }

    /// Writes the current settings back to their file, pretty-printed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(&self.config).map_err(|source| ConfigError::Json {
                path: self.config_file.clone(),
                source,
            })?;
        fs::write(&self.config_file, content).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })?;
        info!("settings saved to '{}'", self.config_file.display());
        Ok(())
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn strict_submission(&self) -> bool {
        self.config.strict_submission
    }

    pub fn set_strict_submission(&mut self, strict: bool) {
        self.config.strict_submission = strict;
    }

    pub fn default_puzzle_name(&self) -> &str {
        &self.config.default_puzzle_name
    }

    pub fn default_energy(&self) -> f64 {
        self.config.default_energy
    }

    pub fn set_default_energy(&mut self, energy: f64) {
        self.config.default_energy = energy;
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.config.log_file.as_deref()
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        self.config.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn set_log_level(&mut self, level: LevelFilter) {
        self.config.log_level = level.as_str().to_lowercase();
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = PuzzleConfig::default();
    }
}
