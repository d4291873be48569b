//! Per-project notification settings and project key patterns.

use std::fmt;

use super::settings::{Prop, Settings};

/// Marker that turns a project key pattern into a prefix match.
pub const WILDCARD: char = '*';

/// Notification settings of one configured project key pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectConfig {
    project_key: String,
    channel_token: Option<String>,
    qg_fail_only: bool,
}

impl ProjectConfig {
    pub fn new(
        project_key: impl Into<String>,
        channel_token: Option<String>,
        qg_fail_only: bool,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            channel_token,
            qg_fail_only,
        }
    }

    /// Read the entry stored under `index`.
    ///
    /// Returns `None` if the entry has no project key.
    pub fn from_settings(settings: &dyn Settings, index: &str) -> Option<Self> {
        let project_key = settings.get_string(&Prop::Project.for_entry(index))?;
        let channel_token = settings.get_string(&Prop::ChannelToken.for_entry(index));
        let qg_fail_only = settings.get_bool(&Prop::QgFailOnly.for_entry(index));
        Some(Self::new(project_key, channel_token, qg_fail_only))
    }

    /// Configured pattern, wildcard marker included.
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn channel_token(&self) -> Option<&str> {
        self.channel_token.as_deref()
    }

    pub fn qg_fail_only(&self) -> bool {
        self.qg_fail_only
    }

    pub fn pattern(&self) -> KeyPattern {
        KeyPattern::parse(&self.project_key)
    }

    /// Channel token with everything but the last four characters hidden.
    pub fn masked_token(&self) -> String {
        match self.channel_token.as_deref() {
            None => "<none>".to_string(),
            Some(t) if t.trim().is_empty() => "<blank>".to_string(),
            Some(t) => {
                let chars: Vec<char> = t.chars().collect();
                let visible = chars.len().saturating_sub(4);
                chars
                    .iter()
                    .enumerate()
                    .map(|(i, c)| if i < visible { '*' } else { *c })
                    .collect()
            }
        }
    }
}

/// Project key pattern: exact key or key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    Exact(String),
    /// Prefix with the trailing wildcard marker stripped
    Prefix(String),
}

impl KeyPattern {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(WILDCARD) {
            Some(prefix) => KeyPattern::Prefix(prefix.to_string()),
            None => KeyPattern::Exact(raw.to_string()),
        }
    }

    pub fn matches(&self, project_key: &str) -> bool {
        match self {
            KeyPattern::Exact(key) => key == project_key,
            KeyPattern::Prefix(prefix) => project_key.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Exact(key) => write!(f, "{}", key),
            KeyPattern::Prefix(prefix) => write!(f, "{}{}", prefix, WILDCARD),
        }
    }
}
