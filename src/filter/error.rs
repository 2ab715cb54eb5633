//! Filter error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::asset::ResolveError;
use crate::config::ConfigError;

use super::template::CompileError;

/// Errors a filter hands back to the pipeline.
///
/// Every variant aborts processing of the current asset; filters never
/// recover locally.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The asset's content could not be compiled.
    #[error("failed to compile `{identity}`")]
    Transform {
        identity: String,
        #[source]
        source: CompileError,
    },

    /// A cache artifact could not be written or read.
    #[error("IO error on artifact `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cached artifact could not be rendered.
    #[error("failed to render artifact `{}`", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// A relative reference inside the asset does not resolve to a file.
    #[error("cannot resolve `{reference}` referenced from `{identity}`")]
    Resolution {
        identity: String,
        reference: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of a [`FilterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transform,
    Io,
    Resolution,
    Config,
}

impl FilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transform { .. } => ErrorKind::Transform,
            // a broken artifact is an execution failure, reported like IO
            Self::Io { .. } | Self::Render { .. } => ErrorKind::Io,
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
