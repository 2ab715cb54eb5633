//! Logical path -> physical filepath resolution.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use super::normalize_logical;

/// Errors raised while resolving a logical asset path.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("asset `{path}` not found in load paths: {}", display_dirs(.searched))]
    NotFound { path: String, searched: Vec<PathBuf> },

    #[error("asset path `{0}` climbs above the asset root")]
    Escapes(String),

    #[error("asset path `{0}` is empty")]
    Empty(String),
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps a logical asset path to the filepath the asset is served from.
pub trait AssetResolver {
    fn resolve(&self, logical: &str) -> Result<String, ResolveError>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Result<String, ResolveError>,
{
    fn resolve(&self, logical: &str) -> Result<String, ResolveError> {
        self(logical)
    }
}

/// Resolves logical paths by searching a list of load paths in order.
///
/// ```text
/// root/
/// ├── assets/            ← load path "assets"
/// │   └── styles/img/a.png
/// └── vendor/            ← load path "vendor"
///
/// resolve("styles/img/a.png") -> "assets/styles/img/a.png"
/// ```
///
/// Returned filepaths are relative to the project root and `/`-separated, so
/// they can be embedded in stylesheets as-is.
#[derive(Debug, Clone)]
pub struct LoadPathResolver {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl LoadPathResolver {
    pub fn new<P: AsRef<Path>>(root: &Path, paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            root: root.to_path_buf(),
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }

    /// Inverse of [`AssetResolver::resolve`]: the logical path of a file
    /// inside one of the load paths.
    ///
    /// `path` may be absolute or relative to the project root. Paths with
    /// `..` below the load path have no identity.
    pub fn identity_of(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        self.paths.iter().find_map(|dir| {
            let inner = rel.strip_prefix(dir).ok()?;
            let segments = inner
                .components()
                .map(|c| match c {
                    Component::Normal(seg) => Some(seg.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            (!segments.is_empty()).then(|| segments.join("/"))
        })
    }
}

impl AssetResolver for LoadPathResolver {
    fn resolve(&self, logical: &str) -> Result<String, ResolveError> {
        let logical = normalize_logical(logical)?;

        for dir in &self.paths {
            if self.root.join(dir).join(&logical).is_file() {
                return Ok(join_filepath(dir, &logical));
            }
        }

        Err(ResolveError::NotFound {
            path: logical,
            searched: self.paths.clone(),
        })
    }
}

/// `dir` + `/` + `logical`, with forward slashes regardless of platform.
fn join_filepath(dir: &Path, logical: &str) -> String {
    let dir = dir.to_string_lossy().replace('\\', "/");
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        logical.to_string()
    } else {
        format!("{dir}/{logical}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LoadPathResolver) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("assets/styles/img")).unwrap();
        fs::create_dir_all(root.join("vendor/img")).unwrap();
        fs::write(root.join("assets/styles/img/a.png"), b"png").unwrap();
        fs::write(root.join("vendor/img/logo.svg"), b"svg").unwrap();
        let resolver = LoadPathResolver::new(root, ["assets", "vendor"]);
        (dir, resolver)
    }

    #[test]
    fn test_resolve_first_load_path() {
        let (_dir, resolver) = setup();
        assert_eq!(
            resolver.resolve("styles/img/a.png").unwrap(),
            "assets/styles/img/a.png"
        );
    }

    #[test]
    fn test_resolve_later_load_path() {
        let (_dir, resolver) = setup();
        assert_eq!(resolver.resolve("img/logo.svg").unwrap(), "vendor/img/logo.svg");
    }

    #[test]
    fn test_resolve_normalizes_dot_segments() {
        let (_dir, resolver) = setup();
        assert_eq!(
            resolver.resolve("styles/../styles/./img/a.png").unwrap(),
            "assets/styles/img/a.png"
        );
    }

    #[test]
    fn test_resolve_missing() {
        let (_dir, resolver) = setup();
        let err = resolver.resolve("styles/img/missing.png").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        let msg = err.to_string();
        assert!(msg.contains("styles/img/missing.png"));
        assert!(msg.contains("assets, vendor"));
    }

    #[test]
    fn test_resolve_directory_is_not_a_file() {
        let (_dir, resolver) = setup();
        assert!(resolver.resolve("styles/img").is_err());
    }

    #[test]
    fn test_identity_of() {
        let (dir, resolver) = setup();
        let abs = dir.path().join("assets/styles/main.css");
        assert_eq!(resolver.identity_of(&abs).as_deref(), Some("styles/main.css"));
        assert_eq!(
            resolver.identity_of(Path::new("vendor/img/logo.svg")).as_deref(),
            Some("img/logo.svg")
        );
        assert_eq!(resolver.identity_of(Path::new("elsewhere/x.css")), None);
    }

    #[test]
    fn test_identity_of_rejects_parent_components() {
        let (dir, resolver) = setup();
        assert_eq!(
            resolver.identity_of(Path::new("assets/../other/x.haml")),
            None
        );
        assert_eq!(
            resolver.identity_of(&dir.path().join("assets/views/../../x.haml")),
            None
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |logical: &str| -> Result<String, ResolveError> {
            Ok(format!("public/{logical}"))
        };
        assert_eq!(resolver.resolve("a.png").unwrap(), "public/a.png");
    }
}
