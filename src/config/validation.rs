//! Configuration validation.

use anyhow::{bail, Result};
use regex::Regex;

use super::Config;
use crate::domain::{ConfigStore, MapSettings, Prop, Settings};

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Validate log path
    if !config.log_path.as_os_str().is_empty() {
        // Path will be created if it doesn't exist, so just check it's valid
        if config.log_path.to_string_lossy().contains('\0') {
            bail!("Invalid log_path: contains null character");
        }
    }

    if config.timeout_secs == 0 {
        bail!("timeout_secs must be greater than 0");
    }

    for key in config.settings.keys() {
        if key.trim().is_empty() {
            bail!("settings: property key cannot be empty");
        }
    }

    let settings = config.notifier_settings();
    if let Some(base_path) = settings.get_string(Prop::BasePath.property()) {
        let scheme = Regex::new(r"^https?://[^\s/]+")?;
        if !base_path.is_empty() && !scheme.is_match(&base_path) {
            bail!(
                "settings['{}']: '{}' is not an http(s) URL",
                Prop::BasePath.property(),
                base_path
            );
        }
    }

    Ok(())
}

/// Dry-run a refresh to surface project configuration errors.
pub fn validate_project_configs(settings: &MapSettings) -> Result<usize> {
    let mut store = ConfigStore::new();
    store.refresh(settings)?;
    Ok(store.len())
}

/// Per-entry properties whose index is not listed in `dadapush.projectconfig`.
///
/// Such entries are ignored by the notifier, which usually means the index
/// list was edited without removing the entry.
pub fn orphaned_entries(settings: &MapSettings) -> Result<Vec<String>> {
    let pattern = Regex::new(&format!(
        r"^{}\.([^.]+)\.({})$",
        regex::escape(Prop::Config.property()),
        Prop::FIELDS
            .iter()
            .map(|p| regex::escape(p.property()))
            .collect::<Vec<_>>()
            .join("|")
    ))?;
    let indexes = settings.get_string_array(Prop::Config.property());

    let orphans = settings
        .keys()
        .filter(|key| {
            pattern
                .captures(key)
                .and_then(|caps| caps.get(1))
                .is_some_and(|index| !indexes.iter().any(|i| i == index.as_str()))
        })
        .map(String::from)
        .collect();
    Ok(orphans)
}
