//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/sonar-dadapush/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sonar-dadapush")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // Unset log_path still holds the home-based default; move it next to the config file
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> &'static str {
        r#"# sonar-dadapush configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/sonar-dadapush/logs"

# Timeout for DaDaPush requests in seconds (default: 10)
timeout_secs = 10

# Notifier properties
[settings]
# Are DaDaPush notifications enabled in general? (default: false)
"dadapush.enabled" = false

# DaDaPush API base path (default: https://www.dadapush.com)
"dadapush.basePath" = "https://www.dadapush.com"

# Project specific configuration: list the entry indexes, then describe each
# entry. A project key may end with the '*' wildcard. If several entries
# match a project, the first declared one is used. Entries without a channel
# token send no notification.
"dadapush.projectconfig" = []

# "dadapush.projectconfig" = ["1", "2"]
#
# "dadapush.projectconfig.1.project" = "com.acme:*"
# "dadapush.projectconfig.1.channelToken" = "ctok..."
# Notify only when the quality gate did not pass
# "dadapush.projectconfig.1.qg" = true
#
# "dadapush.projectconfig.2.project" = "com.acme:legacy"
# "dadapush.projectconfig.2.channelToken" = "ctok..."
"#
    }
}
