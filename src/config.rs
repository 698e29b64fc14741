//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::{StylePalette, parse_hex_color};
use crate::report::{CheckoutPolicy, PunchClassifier, ReportGridBuilder};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (defaults apply).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Grid computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Minutes of lateness tolerated before a check-in counts as late.
    pub tolerance_minutes: i64,
    pub checkout_policy: CheckoutPolicy,
    /// File name used when no date range was requested.
    pub default_file_name: String,
    /// Sheet title override; derived from the first report day when unset.
    pub sheet_title: Option<String>,
}

/// Upstream attendance service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Endpoint returning the employee batch. Empty disables fetching.
    pub url: String,
    /// Local fixture used when the upstream fetch fails.
    pub fallback_file: PathBuf,
    pub timeout_secs: u64,
}

/// Spreadsheet layout and styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub title: String,
    pub subtitles: Vec<String>,
    /// Write minute totals as `1h 5m` instead of plain numbers.
    pub human_durations: bool,
    pub palette: StylePalette,
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files. Console only when unset.
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Get config file path (platform config dir, else next to the executable).
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("", "", "attendance-report") {
            return dirs.config_dir().join("config.toml");
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.tolerance_minutes < 0 {
            return Err(ConfigError::Validation(
                "Tolerance minutes cannot be negative".to_string(),
            ));
        }
        if self.report.tolerance_minutes > 120 {
            return Err(ConfigError::Validation(
                "Tolerance minutes cannot exceed 120".to_string(),
            ));
        }
        if self.report.default_file_name.trim().is_empty() {
            return Err(ConfigError::Validation("Default file name cannot be empty".to_string()));
        }
        if !self.source.url.is_empty() && !self.source.url.starts_with("http") {
            return Err(ConfigError::Validation(
                "Source URL must start with http:// or https://".to_string(),
            ));
        }
        if self.source.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Source timeout must be at least 1 second".to_string(),
            ));
        }
        if let Some(bad) = self.export.palette.colors().find(|c| parse_hex_color(c).is_none()) {
            return Err(ConfigError::Validation(format!(
                "Invalid palette colour '{bad}', expected RRGGBB"
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ReportConfig {
    /// Grid builder configured with this tolerance and check-out policy.
    pub fn grid_builder(&self) -> ReportGridBuilder {
        ReportGridBuilder::new(PunchClassifier::new(self.tolerance_minutes).with_checkout_policy(self.checkout_policy))
    }
}

impl SourceConfig {
    pub fn has_upstream(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tolerance_minutes: 5,
            checkout_policy: CheckoutPolicy::SignOnly,
            default_file_name: "marcaciones_personal.xlsx".to_string(),
            sheet_title: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            fallback_file: PathBuf::from("test.json"),
            timeout_secs: 30,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "REPORTE DE CONTROL DE MARCACIONES Y ASISTENCIA DEL PERSONAL".to_string(),
            subtitles: vec!["Gestión del Talento Humano".to_string()],
            human_durations: false,
            palette: StylePalette::default(),
        }
    }
}
