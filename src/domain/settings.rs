//! Flat key/value settings and the DaDaPush property naming scheme.

use std::collections::BTreeMap;

/// Property names understood by the notifier.
///
/// Per-project entries are addressed as
/// `dadapush.projectconfig.<index>.<field>`, where `<field>` is one of
/// [`Prop::Project`], [`Prop::ChannelToken`] or [`Prop::QgFailOnly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    /// Base URL of the DaDaPush API
    BasePath,
    /// Plugin-wide kill switch
    Enabled,
    /// List of per-project configuration indexes
    Config,
    /// Project key pattern of one entry
    Project,
    /// Channel token of one entry
    ChannelToken,
    /// Only notify on a failed quality gate
    QgFailOnly,
}

impl Prop {
    /// Global properties, in the order they are reported.
    pub const GLOBAL: [Prop; 3] = [Prop::BasePath, Prop::Enabled, Prop::Config];

    /// Per-entry fields.
    pub const FIELDS: [Prop; 3] = [Prop::Project, Prop::ChannelToken, Prop::QgFailOnly];

    /// Property key (global) or field name (per-entry).
    pub fn property(self) -> &'static str {
        match self {
            Prop::BasePath => "dadapush.basePath",
            Prop::Enabled => "dadapush.enabled",
            Prop::Config => "dadapush.projectconfig",
            Prop::Project => "project",
            Prop::ChannelToken => "channelToken",
            Prop::QgFailOnly => "qg",
        }
    }

    /// Value used when the property is not set.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Prop::BasePath => Some(DEFAULT_BASE_PATH),
            Prop::Enabled => Some("false"),
            _ => None,
        }
    }

    /// Key of a per-entry field for the given configuration index.
    pub fn for_entry(self, index: &str) -> String {
        format!("{}.{}.{}", Prop::Config.property(), index, self.property())
    }

    fn default_for_key(key: &str) -> Option<&'static str> {
        Prop::GLOBAL
            .iter()
            .find(|p| p.property() == key)
            .and_then(|p| p.default_value())
    }
}

/// Default DaDaPush endpoint.
pub const DEFAULT_BASE_PATH: &str = "https://www.dadapush.com";

/// Read-only settings lookup.
pub trait Settings {
    /// Raw string value, or `None` if the key is not set.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Boolean value; anything other than a case-insensitive `true` is `false`.
    fn get_bool(&self, key: &str) -> bool {
        self.get_string(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Comma-separated multi-value, trimmed, empty items dropped.
    fn get_string_array(&self, key: &str) -> Vec<String> {
        self.get_string(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Settings backed by an in-memory map, falling back to property defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSettings {
    values: BTreeMap<String, String>,
}

impl MapSettings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Iterate over explicitly set keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for MapSettings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Settings for MapSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| Prop::default_for_key(key).map(String::from))
    }
}
