/// Service configuration loaded from a TOML file.
///
/// Every section and key is optional; anything left out falls back to the
/// defaults below. Environment variables (optionally from a `.env` file)
/// can point at the config file and override the most commonly tuned
/// limits:
///
///   INCIDENT_REVIEW_CONFIG  path to the TOML file
///   INCIDENT_MAX_ROWS       overrides `upload.max_rows`
///   INCIDENT_TOP_N          overrides `analytics.top_n`

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::analysis::normalize::ValueNormalizer;
use crate::logging::{self, Component, LogLevel};
use crate::model::{EMPTY_LABEL, OTHER_LABEL};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_ROWS: usize = 50_000;
pub const DEFAULT_TOP_N: usize = 8;

pub const ENV_CONFIG_PATH: &str = "INCIDENT_REVIEW_CONFIG";
pub const ENV_MAX_ROWS: &str = "INCIDENT_MAX_ROWS";
pub const ENV_TOP_N: &str = "INCIDENT_TOP_N";

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upload: UploadConfig,
    pub analytics: AnalyticsConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Data rows accepted per upload. Zero falls back to the default.
    pub max_rows: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl UploadConfig {
    pub fn effective_max_rows(&self) -> usize {
        if self.max_rows == 0 {
            DEFAULT_MAX_ROWS
        } else {
            self.max_rows
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Categories shown per chart before the tail is folded.
    pub top_n: usize,
    pub empty_label: String,
    pub other_label: String,
}

impl AnalyticsConfig {
    /// Normalizer using the configured empty label. Analytics, facet
    /// options, filters and upload stats must all share this one.
    pub fn normalizer(&self) -> ValueNormalizer {
        ValueNormalizer::new(self.empty_label.as_str())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            empty_label: EMPTY_LABEL.to_string(),
            other_label: OTHER_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub file_name: String,
    /// Prefix joined with the issue key to build the hyperlink target.
    pub issue_base_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "incidents".to_string(),
            file_name: "tsc_report_normalized.xlsx".to_string(),
            issue_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, ConfigError> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::Invalid(format!("unknown log level '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The file is not valid TOML for this schema.
    Parse(String),
    /// The file parsed but a value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `.env`, then the file named by `INCIDENT_REVIEW_CONFIG` (or the
    /// defaults if unset), then applies the environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => {
                logging::debug(Component::Config, Some(&path), "loading config file");
                Self::load(&path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name. Unset variables are
    /// ignored; set but unparseable ones are an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_ROWS) {
            self.upload.max_rows = parse_usize(ENV_MAX_ROWS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TOP_N) {
            self.analytics.top_n = parse_usize(ENV_TOP_N, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.top_n == 0 {
            return Err(ConfigError::Invalid("analytics.top_n must be at least 1".into()));
        }
        if self.analytics.empty_label.trim().is_empty() {
            return Err(ConfigError::Invalid("analytics.empty_label must not be blank".into()));
        }
        if self.analytics.other_label.trim().is_empty() {
            return Err(ConfigError::Invalid("analytics.other_label must not be blank".into()));
        }
        self.logging.min_level()?;
        Ok(())
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a non-negative integer, got '{}'", name, raw)))
}
