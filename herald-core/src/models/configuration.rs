//! Configuration data structures

use crate::error::{NotifierError, Result};
use crate::transport::DsnLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Logging level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Settings for the default HTTP client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds (0 = client default)
    pub timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Logging verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub http: HttpSettings,
    /// Channel name -> DSN string (may combine DSNs with `||` or `&&`).
    ///
    /// Channels are kept in name order, not file order. A message that names
    /// no channel goes to the first channel, by name, that supports it.
    #[serde(default)]
    pub transports: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut transports = BTreeMap::new();
        transports.insert("default".to_string(), "null://null".to_string());
        Self {
            log_level: LogLevel::Info,
            http: HttpSettings::default(),
            transports,
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| NotifierError::Config(format!("{}: {}", path.display(), e)))?;
            toml::from_str(&content)
                .map_err(|e| NotifierError::Config(format!("{}: {}", path.display(), e)))
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| NotifierError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| NotifierError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| NotifierError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NotifierError::Config("Could not determine config directory".into()))?;
        Ok(config_dir.join("herald").join("config.toml"))
    }

    /// Validate configuration values, collecting every problem
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.http.timeout_seconds > 300 {
            errors.push("http.timeout_seconds cannot exceed 300".to_string());
        }

        if self.transports.is_empty() {
            errors.push("transports must declare at least one channel".to_string());
        }

        for (name, dsn) in &self.transports {
            if !is_valid_channel_name(name) {
                errors.push(format!(
                    "transport name \"{}\" must match channel naming convention",
                    name
                ));
            }
            if let Err(e) = DsnLayout::parse(dsn) {
                errors.push(format!("transport \"{}\": {}", name, e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validate channel name according to naming convention
pub fn is_valid_channel_name(name: &str) -> bool {
    let Some(first_char) = name.chars().next() else {
        return false;
    };
    if name.len() > 64 || !first_char.is_ascii_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
