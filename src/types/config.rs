use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::error::ConfigError;

/// The sentinel every default configuration recognizes as "match anything".
pub const ANY: &str = "ANY";

/// Rendering mode of the reference translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Names only.
    #[default]
    Simple,
    /// Names with underlying values and expanded group members.
    Detailed,
}

/// A reference-bearing rule field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefField {
    Source,
    Destination,
    Service,
}

/// Per-field delimiters used to split reference lists.
///
/// Exports are not consistent about this: the same table may separate one
/// column with `"; "` and another with newlines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldDelimiters {
    pub source: String,
    pub destination: String,
    pub service: String,
}

impl Default for FieldDelimiters {
    fn default() -> Self {
        Self {
            source: ";".to_owned(),
            destination: ";".to_owned(),
            service: ";".to_owned(),
        }
    }
}

impl FieldDelimiters {
    #[must_use]
    pub fn get(&self, field: RefField) -> &str {
        match field {
            RefField::Source => self.source.as_str(),
            RefField::Destination => self.destination.as_str(),
            RefField::Service => self.service.as_str(),
        }
    }

    fn set(&mut self, field: RefField, delimiter: String) {
        match field {
            RefField::Source => self.source = delimiter,
            RefField::Destination => self.destination = delimiter,
            RefField::Service => self.service = delimiter,
        }
    }
}

/// Explicit configuration for reference translation and rule normalization.
///
/// Built with [`ResolverConfig::builder()`] or loaded from JSON:
///
/// ```
/// use ruleview::ResolverConfig;
///
/// let config = ResolverConfig::from_json(r#"{
///     "sentinels": ["97aeb369"],
///     "actions": { "abc123": "Accept" },
///     "delimiters": { "destination": "\n" }
/// }"#).unwrap();
///
/// assert!(config.is_sentinel("97aeb369"));
/// assert_eq!(config.action_name("abc123"), Some("Accept"));
/// assert_eq!(config.delimiters().source, ";");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    sentinels: HashSet<String>,
    actions: HashMap<String, String>,
    delimiters: FieldDelimiters,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sentinels: HashSet::from([ANY.to_owned()]),
            actions: HashMap::new(),
            delimiters: FieldDelimiters::default(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Absent keys keep their defaults, but a
    /// present `sentinels` list replaces the default set entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the input is not valid JSON of the expected shape.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(ConfigError::from)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleviewError`](crate::RuleviewError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuleviewError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    #[must_use]
    pub fn is_sentinel(&self, token: &str) -> bool {
        self.sentinels.contains(token)
    }

    /// The configured display name for a well-known action uid.
    #[must_use]
    pub fn action_name(&self, uid: &str) -> Option<&str> {
        self.actions.get(uid).map(String::as_str)
    }

    #[must_use]
    pub fn delimiters(&self) -> &FieldDelimiters {
        &self.delimiters
    }

    #[must_use]
    pub fn delimiter(&self, field: RefField) -> &str {
        self.delimiters.get(field)
    }
}

/// Builder for [`ResolverConfig`]. Starts from the defaults.
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Add a uid that renders as `ANY`.
    #[must_use]
    pub fn sentinel(mut self, uid: impl Into<String>) -> Self {
        self.config.sentinels.insert(uid.into());
        self
    }

    /// Drop every sentinel, including the literal `ANY`.
    #[must_use]
    pub fn clear_sentinels(mut self) -> Self {
        self.config.sentinels.clear();
        self
    }

    /// Map an action uid to its display name.
    #[must_use]
    pub fn action(mut self, uid: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.actions.insert(uid.into(), name.into());
        self
    }

    #[must_use]
    pub fn delimiter(mut self, field: RefField, delimiter: impl Into<String>) -> Self {
        self.config.delimiters.set(field, delimiter.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert!(config.is_sentinel("ANY"));
        assert!(!config.is_sentinel("any"));
        assert_eq!(config.delimiter(RefField::Source), ";");
        assert_eq!(config.delimiter(RefField::Destination), ";");
        assert_eq!(config.delimiter(RefField::Service), ";");
        assert_eq!(config.action_name("abc123"), None);
    }

    #[test]
    fn builder_extends_defaults() {
        let config = ResolverConfig::builder()
            .sentinel("xyz123")
            .action("abc123", "Accept")
            .delimiter(RefField::Destination, "\n")
            .build();
        assert!(config.is_sentinel("ANY"));
        assert!(config.is_sentinel("xyz123"));
        assert_eq!(config.action_name("abc123"), Some("Accept"));
        assert_eq!(config.delimiter(RefField::Destination), "\n");
        assert_eq!(config.delimiter(RefField::Service), ";");
    }

    #[test]
    fn clear_sentinels() {
        let config = ResolverConfig::builder().clear_sentinels().build();
        assert!(!config.is_sentinel("ANY"));
    }

    #[test]
    fn json_partial_keeps_defaults() {
        let config = ResolverConfig::from_json(r#"{ "delimiters": { "source": "; " } }"#).unwrap();
        assert_eq!(config.delimiter(RefField::Source), "; ");
        assert_eq!(config.delimiter(RefField::Service), ";");
        assert!(config.is_sentinel("ANY"));
    }

    #[test]
    fn json_sentinels_replace_default_set() {
        let config = ResolverConfig::from_json(r#"{ "sentinels": ["uvw456"] }"#).unwrap();
        assert!(config.is_sentinel("uvw456"));
        assert!(!config.is_sentinel("ANY"));
    }

    #[test]
    fn json_wrong_shape_is_error() {
        let err = ResolverConfig::from_json(r#"{ "sentinels": "ANY" }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid resolver config"), "{err}");
    }

    #[test]
    fn detail_level_default_is_simple() {
        assert_eq!(DetailLevel::default(), DetailLevel::Simple);
    }
}
