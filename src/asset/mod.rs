//! Logical asset paths and their resolution to physical files.
//!
//! A logical path (identity) is how the pipeline names an asset, e.g.
//! `styles/main.css`. It is independent of which load path the file lives in.

mod logical;
mod resolve;

pub use logical::{containing_dir, join_relative, normalize_logical};
pub use resolve::{AssetResolver, LoadPathResolver, ResolveError};
