use crate::git::batch::default_jobs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that points at an alternative config file
pub const CONFIG_ENV: &str = "REPOSTAT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub git: GitConfig,
    pub report: ReportConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory name that marks a repository root
    pub marker: String,
    /// Never walk into marker directories
    pub prune_marker: bool,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    pub program: PathBuf,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub color: ColorMode,
    /// Maximum number of status queries running at once
    pub jobs: usize,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Append every query's outcome and duration to `queries.log`
    pub log_queries: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            marker: ".git".to_string(),
            prune_marker: true,
            max_depth: None,
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            program: PathBuf::from("git"),
            timeout_seconds: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            color: ColorMode::Auto,
            jobs: default_jobs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("repostat"))
    }

    /// Get the config file path, honouring `REPOSTAT_CONFIG`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(ConfigError::DirectoryNotFound) => Ok(Self::default_config()),
            Err(e) => Err(e),
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load_from(path)
    }

    /// Load configuration from file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;

        // Validate config
        config.validate()?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config::default()
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.scan.marker.as_str();
        if marker.is_empty() {
            return Err(ConfigError::InvalidValue(
                "scan.marker must not be empty".to_string(),
            ));
        }

        if marker.contains('/') || marker.contains('\\') || marker == "." || marker == ".." {
            return Err(ConfigError::InvalidValue(format!(
                "scan.marker must be a single directory name, got '{}'",
                marker
            )));
        }

        if self.scan.max_depth == Some(0) {
            return Err(ConfigError::InvalidValue(
                "scan.max_depth must be greater than 0".to_string(),
            ));
        }

        if self.git.program.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "git.program must not be empty".to_string(),
            ));
        }

        // Validate git timeout
        if self.git.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "git.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.report.jobs == 0 {
            return Err(ConfigError::InvalidValue(
                "report.jobs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
