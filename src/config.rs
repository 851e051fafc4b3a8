use std::path::Path;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// How the replay binary prints the final state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Text grid plus a status line
    #[default]
    Text,
    /// Engine JSON (`board`, `currentPlayer`, `status`, ...)
    Json,
    /// Session-service JSON with the numeric board encoding
    Session,
}

/// Settings for replaying a move list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub format: OutputFormat,
    /// Start the game before the first move instead of leaving it waiting
    pub start: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            format: OutputFormat::Text,
            start: true,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "warn".to_string(),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_optional(path)? {
            Some(config) => Ok(config),
            None => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML file, or `None` if the file does not
    /// exist. Lets a caller that has no subscriber yet report the fallback
    /// itself once logging is up.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let filter = self.logging.filter.trim();
        if filter.is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }
        if let Err(e) = EnvFilter::try_new(filter) {
            return Err(ConfigError::Validation(format!(
                "logging.filter is not a valid filter: {e}"
            )));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
