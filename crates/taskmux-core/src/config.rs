//! Runner configuration
//!
//! Configuration is optional: a bare `taskmux.md` works with the defaults
//! below, and a `taskmux.toml` or `taskmux.yaml` next to it (or in any
//! ancestor directory) overrides them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::resolver::DEFAULT_DOCUMENT_NAME;

/// Configuration file names searched for, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["taskmux.toml", "taskmux.yaml", "taskmux.yml"];

/// Main configuration for Taskmux
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task runner configuration
    pub runner: RunnerConfig,

    /// Console output configuration
    pub console: ConsoleConfig,
}

/// Task runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum number of concurrently running tasks
    pub jobs: usize,

    /// Keep running remaining tasks after one fails
    pub keep_going: bool,

    /// Task document file name
    pub document: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            keep_going: false,
            document: DEFAULT_DOCUMENT_NAME.to_string(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Width task labels are truncated to
    pub label_width: usize,

    /// Records buffered between stream scanners and the router
    pub queue_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            label_width: 16,
            queue_capacity: 256,
        }
    }
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find a configuration file in `start_dir` or a parent directory.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load the discovered configuration, or the defaults when there is none.
///
/// A missing config file is the normal case for a document-only project, so
/// it is not an error. A config file that exists but fails to load or
/// validate is.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.runner.jobs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "runner.jobs".to_string(),
            message: "must be at least 1".to_string(),
        }
        .into());
    }

    if config.runner.document.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "runner.document".to_string(),
            message: "document file name cannot be empty".to_string(),
        }
        .into());
    }

    if config.console.label_width < 8 {
        return Err(ConfigError::InvalidValue {
            field: "console.label_width".to_string(),
            message: "must be at least 8".to_string(),
        }
        .into());
    }

    if config.console.queue_capacity == 0 {
        return Err(ConfigError::InvalidValue {
            field: "console.queue_capacity".to_string(),
            message: "must be at least 1".to_string(),
        }
        .into());
    }

    Ok(())
}
