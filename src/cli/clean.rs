//! `sieve clean`: drop compiled template artifacts.
//!
//! The template filter never invalidates artifacts by itself, so this is
//! the way to pick up edited templates.

use anyhow::{Context, Result};

use sieve::cache::ArtifactCache;
use sieve::config::SieveConfig;
use sieve::log;

pub fn run_clean(config: &SieveConfig) -> Result<()> {
    let cache = ArtifactCache::new(config.template_cache_dir()?);
    let removed = cache
        .clear()
        .with_context(|| format!("Failed to remove '{}'", cache.dir().display()))?;

    let shown = config.root_relative(cache.dir());
    if removed {
        log!("clean"; "removed {}", shown.display());
    } else {
        log!("clean"; "nothing to remove at {}", shown.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_artifacts() {
        let dir = TempDir::new().unwrap();
        let mut config =
            SieveConfig::from_str("[options]\ntemplate_cache = \"tpl\"").unwrap();
        config.set_root(dir.path());
        fs::create_dir_all(dir.path().join("tpl/views")).unwrap();
        fs::write(dir.path().join("tpl/views/a.haml"), "x").unwrap();

        run_clean(&config).unwrap();
        assert!(!dir.path().join("tpl").exists());

        // Second run is a no-op
        run_clean(&config).unwrap();
    }

    #[test]
    fn test_clean_requires_option() {
        let config = SieveConfig::default();
        assert!(run_clean(&config).is_err());
    }
}
