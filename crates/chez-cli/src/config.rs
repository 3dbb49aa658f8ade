//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (`CHEZ_CONFIG`, through the command line)

use crate::error::{Error, Result};
use chez_schema::schema::DEFAULT_REGEX_SIZE_LIMIT;
use chez_schema::{LoaderConfig, ParseOptions, ValidationOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Validation settings
    pub validation: ValidationConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Assert the `format` keyword instead of treating it as an annotation
    pub validate_formats: bool,

    /// Upper bound on the compiled size of each `pattern`, in bytes
    pub regex_size_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
            file: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_formats: true,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl ValidationConfig {
    /// Validator options for this configuration
    pub fn validation_options(&self) -> ValidationOptions {
        let options = ValidationOptions::new();
        if self.validate_formats {
            options
        } else {
            options.without_format_assertions()
        }
    }

    /// Loader settings carrying the parser limits
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            parse: ParseOptions {
                regex_size_limit: self.regex_size_limit,
            },
            ..LoaderConfig::default()
        }
    }
}

/// Project configuration file name written by `config init`
pub const PROJECT_CONFIG_FILE: &str = ".chez.toml";

impl Config {
    /// Load configuration from a file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match extension(path).as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported config file '{}': expected .toml, .yaml, .yml or .json",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Path of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chez").join("config.toml"))
    }

    /// Get default configuration file paths to check, most specific first
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(PROJECT_CONFIG_FILE),
            PathBuf::from(".chez.yaml"),
            PathBuf::from(".chez.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let chez_dir = config_dir.join("chez");
            paths.push(chez_dir.join("config.toml"));
            paths.push(chez_dir.join("config.yaml"));
            paths.push(chez_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".chez.toml"));
            paths.push(home_dir.join(".chez.yaml"));
            paths.push(home_dir.join(".chez.json"));
        }

        paths
    }

    /// Render in the format implied by `path`'s extension (TOML by default)
    pub fn render_for(&self, path: &Path) -> Result<String> {
        match extension(path).as_deref() {
            Some("yaml" | "yml") => Ok(serde_yaml::to_string(self)?),
            Some("json") => Ok(serde_json::to_string_pretty(self)?),
            _ => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
}
