//! `[options]` section: named pipeline options read by filters.
//!
//! # Example
//!
//! ```toml
//! [options]
//! cache_directory = "cache/out"
//! template_cache = ".sieve/templates"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Output directory for processed assets, relative to the project root.
pub const CACHE_DIRECTORY: &str = "cache_directory";

/// Directory holding compiled template artifacts.
pub const TEMPLATE_CACHE: &str = "template_cache";

/// Read-only accessor over the pipeline options.
///
/// Lookups never fall back to a default: a key that is not configured is a
/// [`ConfigError::MissingOption`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, String>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for callers assembling options in code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an option by key.
    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingOption(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reject empty values; an empty path would silently mean "project root".
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in self.iter() {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "option `{key}` must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Number of directory levels a path adds below the project root.
///
/// Empty and `.` segments do not count, so `cache/out`, `cache/out/` and
/// `./cache/out` are all two levels deep.
pub fn path_depth(path: &str) -> usize {
    path.split(['/', '\\'])
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_present_option() {
        let options = Options::new().with(CACHE_DIRECTORY, "cache/out");
        assert_eq!(options.get(CACHE_DIRECTORY).unwrap(), "cache/out");
        assert!(options.contains(CACHE_DIRECTORY));
    }

    #[test]
    fn test_get_missing_option_is_error() {
        let options = Options::new();
        let err = options.get(CACHE_DIRECTORY).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption(ref key) if key == CACHE_DIRECTORY));
    }

    #[test]
    fn test_validate_rejects_empty_value() {
        let options = Options::new().with(TEMPLATE_CACHE, "  ");
        assert!(options.validate().is_err());
        assert!(Options::new().with(TEMPLATE_CACHE, "tpl").validate().is_ok());
    }

    #[test]
    fn test_path_depth() {
        assert_eq!(path_depth("cache/out"), 2);
        assert_eq!(path_depth("cache/out/"), 2);
        assert_eq!(path_depth("./cache/out"), 2);
        assert_eq!(path_depth("cache"), 1);
        assert_eq!(path_depth(""), 0);
        assert_eq!(path_depth("a//b/c"), 3);
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let options: Options = toml::from_str("cache_directory = \"out\"").unwrap();
        assert_eq!(options.get(CACHE_DIRECTORY).unwrap(), "out");
    }
}
