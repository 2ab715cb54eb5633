//! Sieve - the filter stage of an asset pipeline.
//!
//! - [`filter`]: the [`Filter`](filter::Filter) contract plus the template
//!   and stylesheet filters
//! - [`cache`]: on-disk store for compiled template artifacts
//! - [`asset`]: logical asset paths and their resolution to files
//! - [`config`]: `sieve.toml` loading and the pipeline option accessor

pub mod asset;
pub mod cache;
pub mod config;
pub mod filter;
pub mod logger;
