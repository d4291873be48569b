//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::validation;
use crate::domain::MapSettings;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Timeout for push requests, in seconds
    pub timeout_secs: u64,

    /// Flat notifier properties (`dadapush.*`)
    #[serde(default)]
    pub settings: BTreeMap<String, SettingValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            settings: BTreeMap::new(),
        }
    }
}

/// Default push request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Config {
    /// Validate configuration and return errors if invalid.
    /// Delegates to the comprehensive validation module.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Notifier properties as a settings lookup.
    pub fn notifier_settings(&self) -> MapSettings {
        self.settings
            .iter()
            .map(|(key, value)| (key.clone(), value.to_setting_string()))
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A single property value as written in TOML.
///
/// # Examples
///
/// ```toml
/// [settings]
/// "dadapush.enabled" = true
/// "dadapush.projectconfig" = ["1", "2"]
/// "dadapush.projectconfig.1.project" = "com.acme:*"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Multi-value property
    List(Vec<String>),
}

impl SettingValue {
    /// String form; lists are comma-separated.
    pub fn to_setting_string(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Integer(i) => i.to_string(),
            SettingValue::Float(f) => f.to_string(),
            SettingValue::Text(s) => s.clone(),
            SettingValue::List(items) => items.join(","),
        }
    }
}

/// Get default log path (relative to config directory).
/// Placeholder; ConfigService moves it next to the loaded config file.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("sonar-dadapush")
        })
        .join("logs")
}
