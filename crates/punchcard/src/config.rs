//! Configuration management for punchcard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "punchcard";

/// Default bearer-token file name.
const TOKEN_FILE_NAME: &str = "token";

/// Default camera spool directory name.
const SPOOL_DIR_NAME: &str = "spool";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PUNCHCARD_`, section and key
///    separated by a double underscore, e.g.
///    `PUNCHCARD_SERVICE__ATTENDANCE_URL`)
/// 2. TOML config file at `~/.config/punchcard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend service configuration.
    pub service: ServiceConfig,
    /// Camera configuration.
    pub camera: CameraConfig,
    /// Credential configuration.
    pub credentials: CredentialsConfig,
}

/// Backend service endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the attendance service.
    pub attendance_url: String,
    /// Base URL of the user-management service.
    pub user_url: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Camera-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory an external grabber drops frames into.
    /// Defaults to `~/.local/share/punchcard/spool`
    pub spool_dir: Option<PathBuf>,
    /// Minimum frame size in bytes; smaller files are treated as
    /// capture failures.
    pub min_frame_bytes: u64,
    /// Maximum frame age in seconds. Set to 0 to accept any frame.
    pub max_frame_age_secs: u64,
}

/// Credential-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path to the file holding the bearer token.
    /// Defaults to `~/.local/share/punchcard/token`
    pub token_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            attendance_url: "http://localhost:5002/v1/api/attendance".to_string(),
            user_url: "http://localhost:5001/v1/api/auth".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            spool_dir: None, // Will be resolved to default at runtime
            min_frame_bytes: 1024,
            max_frame_age_secs: 15,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `PUNCHCARD_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PUNCHCARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("service.attendance_url", &self.service.attendance_url),
            ("service.user_url", &self.service.user_url),
        ] {
            if url.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must not be empty"),
                });
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must start with http:// or https:// (got {url})"),
                });
            }
        }

        if self.service.request_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "service.request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.camera.min_frame_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "camera.min_frame_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the attendance service base URL without a trailing slash.
    #[must_use]
    pub fn attendance_url(&self) -> &str {
        self.service.attendance_url.trim_end_matches('/')
    }

    /// Get the user service base URL without a trailing slash.
    #[must_use]
    pub fn user_url(&self) -> &str {
        self.service.user_url.trim_end_matches('/')
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout_secs)
    }

    /// Get the token file path, resolving defaults if not set.
    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        self.credentials
            .token_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(TOKEN_FILE_NAME))
    }

    /// Get the camera spool directory, resolving defaults if not set.
    #[must_use]
    pub fn spool_dir(&self) -> PathBuf {
        self.camera
            .spool_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SPOOL_DIR_NAME))
    }

    /// Get the maximum frame age as a Duration, if limited.
    #[must_use]
    pub fn max_frame_age(&self) -> Option<Duration> {
        if self.camera.max_frame_age_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.camera.max_frame_age_secs))
        }
    }
}
