//! On-disk store for compiled template artifacts.
//!
//! One file per asset at `<dir>/<identity>`. An artifact is valid for as long
//! as the file exists; contents are never compared against the source.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::asset::normalize_logical;

/// Directory helper shared by cache-backed filters.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Storage location for an asset's artifact.
    ///
    /// The identity is normalized first, so `views/./index.haml` and
    /// `/views/index.haml` share one artifact. An identity that is empty or
    /// climbs above the cache directory with `..` is `InvalidInput`.
    pub fn path_for(&self, identity: &str) -> io::Result<PathBuf> {
        let logical = normalize_logical(identity)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        Ok(self.dir.join(logical))
    }

    /// Whether an artifact exists for this identity.
    pub fn contains(&self, identity: &str) -> bool {
        self.path_for(identity).is_ok_and(|path| path.is_file())
    }

    pub fn read(&self, identity: &str) -> io::Result<String> {
        fs::read_to_string(self.path_for(identity)?)
    }

    /// Write an artifact, replacing the destination only once the full
    /// contents are flushed.
    ///
    /// The data goes to a temporary file next to the destination which is
    /// renamed into place. On any error the temporary file is dropped and
    /// removed, so no empty or truncated artifact is left behind.
    pub fn write(&self, identity: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.path_for(identity)?;
        let parent = path.parent().unwrap_or(&self.dir);
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        crate::debug!("cache"; "wrote {}", path.display());
        Ok(path)
    }

    /// Remove every artifact. Missing directory is not an error.
    ///
    /// Returns whether anything was removed.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
