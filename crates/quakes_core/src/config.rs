//! Application configuration.
//!
//! # Responsibility
//! - Load host settings from an optional JSON file.
//! - Validate settings before any store or logger is opened.
//!
//! # Invariants
//! - A missing config file yields `AppConfig::default()`.
//! - Unknown keys are rejected so typos surface early.

use crate::generator::DEFAULT_RANDOM_BATCH;
use crate::toolbar::provider::Platform;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file; `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Record count for the "add random" toolbar action.
    pub random_batch_size: usize,
    /// Overrides the toolbar platform detected from the build target.
    pub platform: Option<Platform>,
    /// GeoJSON file used by refresh.
    pub feed_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            random_batch_size: DEFAULT_RANDOM_BATCH,
            platform: None,
            feed_path: None,
        }
    }
}

impl AppConfig {
    /// Loads config from `path`, falling back to defaults when absent.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.random_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "random_batch_size must be greater than zero".to_string(),
            ));
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Toolbar platform after applying the override.
    pub fn effective_platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::generator::DEFAULT_RANDOM_BATCH;
    use crate::toolbar::provider::Platform;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load(dir.path().join("absent.json")).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.random_batch_size, DEFAULT_RANDOM_BATCH);
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"random_batch_size": 25, "platform": "compact", "log_level": "warn"}}"#
        )
        .expect("write config");

        let config = AppConfig::load(file.path()).expect("config loads");
        assert_eq!(config.random_batch_size, 25);
        assert_eq!(config.effective_platform(), Platform::Compact);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_batch() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"batch": 5}}"#).expect("write config");
        let err = AppConfig::load(file.path()).expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { .. }));

        let config = AppConfig {
            random_batch_size: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_relative_log_dir() {
        let config = AppConfig {
            log_dir: Some("logs".into()),
            ..AppConfig::default()
        };
        let err = config.validate().expect_err("relative log dir");
        assert!(err.to_string().contains("absolute"));
    }
}
