//! Per-project configuration table with change-aware refresh.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::error::NotifyError;
use super::project::{KeyPattern, ProjectConfig};
use super::settings::{Prop, Settings};

/// Result of a successful [`ConfigStore::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The set of project configurations differs from the previous one
    Changed,
    /// Same configurations as before (entries are still rebuilt)
    Unchanged,
}

/// Ordered table of project configurations keyed by raw project key pattern.
///
/// Iteration order is declaration order of the configuration indexes, which
/// makes "first match wins" in the resolver deterministic.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: IndexMap<String, ProjectConfig>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table from the current settings.
    ///
    /// On error the previous table is kept as is.
    pub fn refresh(&mut self, settings: &dyn Settings) -> Result<RefreshOutcome, NotifyError> {
        info!("Refreshing project configs");
        let entries = build_entries(settings)?;

        let old_values: HashSet<&ProjectConfig> = self.entries.values().collect();
        let new_values: HashSet<&ProjectConfig> = entries.values().collect();
        let outcome = if old_values == new_values {
            debug!(entries = new_values.len(), "Project configs unchanged");
            RefreshOutcome::Unchanged
        } else {
            info!("Old configs [{:?}] --> new configs [{:?}]", old_values, new_values);
            RefreshOutcome::Changed
        };

        self.entries = entries;
        Ok(outcome)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (KeyPattern, &ProjectConfig)> + '_ {
        self.entries.iter().map(|(raw, config)| (KeyPattern::parse(raw), config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_entries(
    settings: &dyn Settings,
) -> Result<IndexMap<String, ProjectConfig>, NotifyError> {
    let indexes = settings.get_string_array(Prop::Config.property());
    info!("{}=[{}]", Prop::Config.property(), indexes.join(","));

    let mut entries = IndexMap::new();
    for index in &indexes {
        let config = ProjectConfig::from_settings(settings, index).ok_or_else(|| {
            NotifyError::Configuration(format!(
                "DaDaPush notification configuration is corrupted: entry '{}' has no project key. \
                 At least one project specific parameter has no project key; \
                 ask your administrator to fix the project configuration.",
                index
            ))
        })?;
        info!("Found project configuration [{:?}]", config);
        // Re-inserting an existing key keeps its position and replaces the value.
        entries.insert(config.project_key().to_string(), config);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::MapSettings;

    fn entry(
        settings: MapSettings,
        index: &str,
        project: &str,
        token: &str,
        qg: bool,
    ) -> MapSettings {
        settings
            .with(Prop::Project.for_entry(index), project)
            .with(Prop::ChannelToken.for_entry(index), token)
            .with(Prop::QgFailOnly.for_entry(index), qg.to_string())
    }

    fn two_projects() -> MapSettings {
        let settings = MapSettings::new().with("dadapush.projectconfig", "1,2");
        let settings = entry(settings, "1", "com.acme:*", "tok-a", false);
        entry(settings, "2", "com.other:app", "tok-b", true)
    }

    #[test]
    fn test_store_starts_empty() {
        let store = ConfigStore::new();
        assert!(store.is_empty());
        assert_eq!(store.entries().count(), 0);
    }

    #[test]
    fn test_refresh_builds_entries_in_declaration_order() {
        let mut store = ConfigStore::new();
        let outcome = store.refresh(&two_projects()).unwrap();
        assert_eq!(outcome, RefreshOutcome::Changed);

        let keys: Vec<String> = store.entries().map(|(p, _)| p.to_string()).collect();
        assert_eq!(keys, vec!["com.acme:*", "com.other:app"]);
    }

    #[test]
    fn test_refresh_twice_is_unchanged() {
        let mut store = ConfigStore::new();
        store.refresh(&two_projects()).unwrap();
        let before: Vec<ProjectConfig> = store.entries().map(|(_, c)| c.clone()).collect();

        let outcome = store.refresh(&two_projects()).unwrap();
        assert_eq!(outcome, RefreshOutcome::Unchanged);

        let after: Vec<ProjectConfig> = store.entries().map(|(_, c)| c.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_refresh_detects_value_change() {
        let mut store = ConfigStore::new();
        store.refresh(&two_projects()).unwrap();

        let changed = two_projects().with(Prop::QgFailOnly.for_entry("1"), "true");
        assert_eq!(store.refresh(&changed).unwrap(), RefreshOutcome::Changed);
    }

    #[test]
    fn test_duplicate_pattern_last_index_wins() {
        let settings = MapSettings::new().with("dadapush.projectconfig", "1,2,3");
        let settings = entry(settings, "1", "dup", "first", false);
        let settings = entry(settings, "2", "other", "x", false);
        let settings = entry(settings, "3", "dup", "second", true);

        let mut store = ConfigStore::new();
        store.refresh(&settings).unwrap();

        assert_eq!(store.len(), 2);
        let (pattern, config) = store.entries().next().unwrap();
        assert_eq!(pattern, KeyPattern::Exact("dup".to_string()));
        assert_eq!(config.channel_token(), Some("second"));
        assert!(config.qg_fail_only());
    }

    #[test]
    fn test_missing_project_key_keeps_previous_table() {
        let mut store = ConfigStore::new();
        store.refresh(&two_projects()).unwrap();

        let broken = two_projects()
            .with("dadapush.projectconfig", "1,2,3")
            .with(Prop::ChannelToken.for_entry("3"), "orphan");
        let err = store.refresh(&broken).unwrap_err();
        assert!(matches!(err, NotifyError::Configuration(_)));
        assert!(err.to_string().contains("no project key"));

        let keys: Vec<String> = store.entries().map(|(p, _)| p.to_string()).collect();
        assert_eq!(keys, vec!["com.acme:*", "com.other:app"]);
    }

    #[test]
    fn test_refresh_without_indexes_empties_store() {
        let mut store = ConfigStore::new();
        store.refresh(&two_projects()).unwrap();

        assert_eq!(
            store.refresh(&MapSettings::new()).unwrap(),
            RefreshOutcome::Changed
        );
        assert!(store.is_empty());
    }
}
