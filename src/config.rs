// Typo-Suggest Configuration
// TOML file plus environment overrides

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::keyboard::{LayoutRegistry, DEFAULT_LAYOUT};
use crate::service::DEFAULT_LENGTH_TOLERANCE;
use crate::types::FinderError;

/// Environment variable overriding `[log] level`
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable overriding `[keyboard] layout`
pub const ENV_KEYBOARD_LAYOUT: &str = "KEYBOARD_LAYOUT";

/// Complete configuration
///
/// ```toml
/// [references]
/// domains = ["gmail.com", "hotmail.com"]
///
/// [finder]
/// algorithm = "jaro-winkler"
/// length_tolerance = 0.2
/// prefix_buckets = false
/// marking_typos = false
///
/// [keyboard]
/// layout = "qwerty-us"
///
/// [log]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference lists by label
    pub references: BTreeMap<String, Vec<String>>,
    pub finder: FinderConfig,
    pub keyboard: KeyboardConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Name understood by [`crate::algorithm::by_name`]
    pub algorithm: String,
    pub length_tolerance: f64,
    pub prefix_buckets: bool,
    /// Apply `^H`/`^W` erase markings before matching
    pub marking_typos: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: "jaro-winkler".to_string(),
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
            prefix_buckets: false,
            marking_typos: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Layout used for tie-breaking
    pub layout: String,
    /// Extra layouts: name → rows, leading spaces pad columns
    pub layouts: BTreeMap<String, Vec<String>>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            layouts: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `info` or `typo_suggest=debug`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FinderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FinderError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, FinderError> {
        toml::from_str(content).map_err(|e| FinderError::Config(e.to_string()))
    }

    /// Apply `LOG_LEVEL` and `KEYBOARD_LAYOUT` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log.level = level;
        }
        if let Some(layout) = lookup(ENV_KEYBOARD_LAYOUT).filter(|v| !v.is_empty()) {
            self.keyboard.layout = layout;
        }
    }

    /// Built-in layouts plus the configured ones
    pub fn layout_registry(&self) -> LayoutRegistry {
        let mut registry = LayoutRegistry::with_defaults();
        for (name, rows) in &self.keyboard.layouts {
            registry.register(name.as_str(), rows.as_slice());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.finder.algorithm, "jaro-winkler");
        assert_eq!(config.finder.length_tolerance, 0.2);
        assert!(!config.finder.prefix_buckets);
        assert_eq!(config.keyboard.layout, "qwerty-us");
        assert_eq!(config.log.level, "info");
        assert!(config.references.is_empty());
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml_str(
            r#"
            [references]
            domains = ["gmail.com", "hotmail.com"]

            [finder]
            algorithm = "levenshtein"
            length_tolerance = 0.5
            prefix_buckets = true
            marking_typos = true

            [keyboard]
            layout = "abc"

            [keyboard.layouts]
            abc = ["abc", " def"]

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.references["domains"], ["gmail.com", "hotmail.com"]);
        assert_eq!(config.finder.algorithm, "levenshtein");
        assert_eq!(config.finder.length_tolerance, 0.5);
        assert!(config.finder.prefix_buckets);
        assert!(config.finder.marking_typos);
        assert_eq!(config.log.level, "debug");

        let layouts = config.layout_registry();
        assert!(layouts.contains("abc"));
        assert!(layouts.contains("qwerty-us"));
        assert_eq!(layouts.get("abc").unwrap().len(), 6);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = Config::from_toml_str("[finder]\nprefix_buckets = true\n").unwrap();
        assert!(config.finder.prefix_buckets);
        assert_eq!(config.finder.algorithm, "jaro-winkler");
        assert_eq!(config.finder.length_tolerance, 0.2);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[finder\n").unwrap_err();
        assert!(matches!(err, FinderError::Config(_)));

        let err = Config::from_toml_str("[finder]\nlength_tolerance = \"wide\"\n").unwrap_err();
        assert!(matches!(err, FinderError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/typo-suggest.toml").unwrap_err();
        match err {
            FinderError::Config(msg) => assert!(msg.contains("/nonexistent/typo-suggest.toml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_LOG_LEVEL => Some("trace".to_string()),
            ENV_KEYBOARD_LAYOUT => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.log.level, "trace");
        // Empty values are ignored
        assert_eq!(config.keyboard.layout, "qwerty-us");
    }
}
