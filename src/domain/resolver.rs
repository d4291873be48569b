//! Project key resolution and notification suppression.

use std::fmt;

use tracing::{info, warn};

use super::project::ProjectConfig;
use super::store::ConfigStore;
use super::types::{GateStatus, QualityGate};

/// Resolves concrete project keys against a [`ConfigStore`].
pub struct ConfigResolver<'a> {
    store: &'a ConfigStore,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    /// Find the configuration for `project_key`.
    ///
    /// When several patterns match, the first one in declaration order wins;
    /// an exact pattern gets no precedence over an earlier wildcard.
    pub fn resolve(&self, project_key: &str) -> Option<&'a ProjectConfig> {
        let candidates: Vec<&'a ProjectConfig> = self
            .store
            .entries()
            .filter(|(pattern, _)| pattern.matches(project_key))
            .map(|(_, config)| config)
            .collect();

        let Some(first) = candidates.first() else {
            info!(
                "Could not find config for project [{}] in {} configured entries",
                project_key,
                self.store.len()
            );
            return None;
        };

        if candidates.len() > 1 {
            warn!(
                matches = candidates.len(),
                "More than 1 project key was matched. Using first one: {}",
                first.project_key()
            );
        }
        Some(*first)
    }
}

/// Why a notification is not sent for a resolved project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No channel token (or only whitespace) configured
    BlankChannelToken,
    /// Only failed gates are reported and this one passed
    QualityGatePassed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankChannelToken => write!(f, "channel token is blank"),
            SkipReason::QualityGatePassed => write!(f, "quality gate passed"),
        }
    }
}

/// Suppression rule for a resolved project, if any applies.
pub fn skip_reason(
    config: &ProjectConfig,
    quality_gate: Option<&QualityGate>,
) -> Option<SkipReason> {
    let blank = config
        .channel_token()
        .map_or(true, |token| token.trim().is_empty());
    if blank {
        info!(
            "DaDaPush channel token for project [{}] is blank, notifications disabled",
            config.project_key()
        );
        return Some(SkipReason::BlankChannelToken);
    }

    if let Some(gate) = quality_gate {
        if config.qg_fail_only() && gate.status == GateStatus::Ok {
            info!(
                "Project [{}] set up to send notification on failed quality gate only, but was: {}",
                config.project_key(),
                gate.status
            );
            return Some(SkipReason::QualityGatePassed);
        }
    }

    None
}

/// Whether the notification for `config` should be suppressed.
#[allow(dead_code)]
pub fn should_skip(config: &ProjectConfig, quality_gate: Option<&QualityGate>) -> bool {
    skip_reason(config, quality_gate).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{MapSettings, Prop};

    fn store_with(entries: &[(&str, &str)]) -> ConfigStore {
        let indexes: Vec<String> = (1..=entries.len()).map(|i| i.to_string()).collect();
        let mut settings = MapSettings::new().with(Prop::Config.property(), indexes.join(","));
        for (index, (project, token)) in indexes.iter().zip(entries) {
            settings = settings
                .with(Prop::Project.for_entry(index), *project)
                .with(Prop::ChannelToken.for_entry(index), *token);
        }
        let mut store = ConfigStore::new();
        store.refresh(&settings).unwrap();
        store
    }

    fn gate(status: GateStatus) -> QualityGate {
        QualityGate {
            status,
            conditions: Vec::new(),
        }
    }

    #[test]
    fn test_exact_declared_first_wins() {
        let store = store_with(&[("foo", "exact"), ("fo*", "wild")]);
        let resolved = ConfigResolver::new(&store).resolve("foo").unwrap();
        assert_eq!(resolved.channel_token(), Some("exact"));
    }

    #[test]
    fn test_wildcard_declared_first_wins() {
        let store = store_with(&[("fo*", "wild"), ("foo", "exact")]);
        let resolved = ConfigResolver::new(&store).resolve("foo").unwrap();
        assert_eq!(resolved.channel_token(), Some("wild"));
    }

    #[test]
    fn test_wildcard_resolution_boundaries() {
        let store = store_with(&[("com.acme.*", "acme")]);
        let resolver = ConfigResolver::new(&store);
        assert!(resolver.resolve("com.acme.widgets").is_some());
        assert!(resolver.resolve("com.acme.").is_some());
        assert!(resolver.resolve("com.acme").is_none());
    }

    #[test]
    fn test_no_match_returns_none() {
        let store = store_with(&[("a", "t"), ("b*", "t")]);
        assert!(ConfigResolver::new(&store).resolve("c").is_none());
        assert!(ConfigResolver::new(&ConfigStore::new()).resolve("a").is_none());
    }

    #[test]
    fn test_blank_token_is_skipped() {
        for token in [None, Some(""), Some("   ")] {
            let config = ProjectConfig::new("p", token.map(String::from), false);
            assert!(should_skip(&config, Some(&gate(GateStatus::Error))));
            assert_eq!(skip_reason(&config, None), Some(SkipReason::BlankChannelToken));
        }
    }

    #[test]
    fn test_fail_only_skips_passed_gate() {
        let config = ProjectConfig::new("p", Some("tok".to_string()), true);
        assert_eq!(
            skip_reason(&config, Some(&gate(GateStatus::Ok))),
            Some(SkipReason::QualityGatePassed)
        );
        assert!(!should_skip(&config, Some(&gate(GateStatus::Error))));
        assert!(!should_skip(&config, Some(&gate(GateStatus::Warn))));
        assert!(!should_skip(&config, None));
    }

    #[test]
    fn test_notify_always_when_not_fail_only() {
        let config = ProjectConfig::new("p", Some("tok".to_string()), false);
        assert!(!should_skip(&config, Some(&gate(GateStatus::Ok))));
        assert!(!should_skip(&config, Some(&gate(GateStatus::Error))));
        assert!(!should_skip(&config, None));
    }
}
