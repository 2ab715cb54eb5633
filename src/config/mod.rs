//! Project configuration management for `sieve.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── options    # [options] accessor and option keys
//! ├── util       # config file discovery
//! └── mod.rs     # SieveConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `[options]` | Pipeline options (cache output dir, template cache)  |
//! | `[assets]`  | Load paths searched when resolving logical assets    |
//! | `[vars]`    | Variables exposed to compiled templates              |

mod error;
pub mod options;
mod util;

pub use error::ConfigError;
pub use options::{CACHE_DIRECTORY, Options, TEMPLATE_CACHE, path_depth};
pub use util::{find_config_file, find_config_file_from};

use crate::asset::LoadPathResolver;
use crate::filter::Vars;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "sieve.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sieve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SieveConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Pipeline options, read by filters through [`Options::get`]
    #[serde(default)]
    pub options: Options,

    /// Asset load paths
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Template variables
    #[serde(default)]
    pub vars: Vars,
}

/// `[assets]` section configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directories searched, in order, for logical asset paths.
    /// Relative to the project root.
    pub paths: Vec<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from("assets")],
        }
    }
}

impl SieveConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// The project root is the config file's parent directory.
    pub fn load(config_name: &Path) -> Result<Self> {
        let config_path = find_config_file(config_name).with_context(|| {
            format!(
                "Config file '{}' not found in the current directory or any parent",
                config_name.display()
            )
        })?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.set_root(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Directory processed assets are written to (`[options] cache_directory`).
    pub fn output_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.root_join(self.options.get(CACHE_DIRECTORY)?))
    }

    /// Directory compiled template artifacts live in (`[options] template_cache`).
    pub fn template_cache_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.root_join(self.options.get(TEMPLATE_CACHE)?))
    }

    /// Asset resolver over the configured load paths.
    pub fn resolver(&self) -> LoadPathResolver {
        LoadPathResolver::new(&self.root, self.assets.paths.iter())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration values that do not depend on the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.paths.is_empty() {
            return Err(ConfigError::Validation(
                "[assets] paths must list at least one directory".into(),
            ));
        }
        if let Some(path) = self.assets.paths.iter().find(|p| p.is_absolute()) {
            return Err(ConfigError::Validation(format!(
                "[assets] path '{}' must be relative to the project root",
                path.display()
            )));
        }
        self.options.validate()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SieveConfig {
    let (parsed, ignored) = SieveConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
