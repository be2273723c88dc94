//! CLI configuration management
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file (`variate.toml`), `VARIATE_*` environment variables and command-line
//! flags.
//!
//! ```toml
//! seed = 42
//! grid_points = 10000
//! max_attempts = 1000000   # 0 removes the cap
//! refine_supremum = true
//! log_level = "info"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use variate_sampling::SamplerConfig;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "variate.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariateConfig {
    /// Seed for the random source; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Grid points for the acceptance-rejection supremum search
    pub grid_points: usize,
    /// Draw cap per inverse-transform batch (0 removes the cap)
    pub max_attempts: usize,
    /// Refine the supremum with the density's critical points
    pub refine_supremum: bool,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

impl Default for VariateConfig {
    fn default() -> Self {
        let sampler = SamplerConfig::default();
        Self {
            seed: None,
            grid_points: sampler.grid_points(),
            max_attempts: sampler.max_attempts().unwrap_or(0),
            refine_supremum: sampler.refine_supremum(),
            log_level: LogLevel::default(),
        }
    }
}

impl VariateConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: VariateConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VARIATE_*` overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("VARIATE_SEED") {
            self.seed = Some(parse_value("VARIATE_SEED", &seed)?);
        }
        if let Some(points) = lookup("VARIATE_GRID_POINTS") {
            self.grid_points = parse_value("VARIATE_GRID_POINTS", &points)?;
        }
        if let Some(attempts) = lookup("VARIATE_MAX_ATTEMPTS") {
            self.max_attempts = parse_value("VARIATE_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(refine) = lookup("VARIATE_REFINE_SUPREMUM") {
            self.refine_supremum = parse_value("VARIATE_REFINE_SUPREMUM", &refine.to_lowercase())?;
        }
        if let Some(level) = lookup("VARIATE_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_points < 2 {
            return Err(ConfigError::InvalidValue {
                name: "grid_points",
                value: format!("{} (at least 2 required)", self.grid_points),
            });
        }
        Ok(())
    }

    /// Sampler configuration carrying these settings
    pub fn sampler_config(&self) -> Result<SamplerConfig, variate_sampling::ConfigError> {
        let mut builder = SamplerConfig::builder()
            .grid_points(self.grid_points)
            .refine_supremum(self.refine_supremum)
            .max_attempts((self.max_attempts > 0).then_some(self.max_attempts));
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file path
    pub config_file: Option<std::path::PathBuf>,
    /// Seed override
    pub seed: Option<u64>,
    /// Force debug logging
    pub verbose: bool,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (explicit path, or `variate.toml` if present)
/// 4. Default values
pub fn build_config(cli: &CliOverrides) -> Result<VariateConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => VariateConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            VariateConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => VariateConfig::default(),
    };

    config.apply_env(|name| std::env::var(name).ok())?;

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.verbose {
        config.log_level = LogLevel::Debug;
    }

    Ok(config)
}
