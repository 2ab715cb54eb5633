//! Stylesheet `url()` rewriting.
//!
//! Processed stylesheets are written into the cache-output directory, which
//! sits `N` levels below the project root. Relative references in the source
//! stylesheet point at files next to the *source*, so each one is resolved to
//! its root-relative filepath and prefixed with `N` × `../`:
//!
//! ```text
//! cache_directory = "cache/out"          (N = 2)
//! asset           = styles/main.css
//!
//! url(img/a.png)  ──▶  url(../../assets/styles/img/a.png)
//! ```
//!
//! Only bare or quoted paths made of `[a-zA-Z0-9/._-]` are rewritten. Data
//! URIs, absolute URLs and anything with a query string or fragment never
//! match and pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

use crate::asset::{AssetResolver, join_relative, normalize_logical};
use crate::config::{CACHE_DIRECTORY, path_depth};
use crate::debug;

use super::{Filter, FilterContext, FilterError};

static URL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(['"]?([a-zA-Z0-9/._-]+)['"]?\)"#).unwrap());

/// Rewrites relative `url()` references against the cache-output depth.
///
/// References are re-resolved on every call; nothing is memoized.
#[derive(Debug, Clone)]
pub struct CssUrlFilter<R> {
    resolver: R,
}

impl<R: AssetResolver> CssUrlFilter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    fn resolve_reference(
        &self,
        reference: &str,
        identity: &str,
        ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError> {
        let resolution_error = |source| FilterError::Resolution {
            identity: identity.to_string(),
            reference: reference.to_string(),
            source,
        };

        let logical =
            normalize_logical(&join_relative(ctx.dir(), reference)).map_err(resolution_error)?;
        self.resolver.resolve(&logical).map_err(resolution_error)
    }
}

impl<R: AssetResolver> Filter for CssUrlFilter<R> {
    fn name(&self) -> &'static str {
        "css"
    }

    fn apply(
        &mut self,
        content: &str,
        identity: &str,
        ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError> {
        // Read config before touching content so a missing option always fails
        let depth = path_depth(ctx.options().get(CACHE_DIRECTORY)?);
        let base = "../".repeat(depth);

        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for caps in URL_REF.captures_iter(content) {
            let (Some(whole), Some(reference)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let filepath = self.resolve_reference(reference.as_str(), identity, ctx)?;
            debug!("css"; "{}: url({}) -> url({}{})", identity, reference.as_str(), base, filepath);

            out.push_str(&content[last..whole.start()]);
            out.push_str("url(");
            out.push_str(&base);
            out.push_str(&filepath);
            out.push(')');
            last = whole.end();
        }
        out.push_str(&content[last..]);

        Ok(out)
    }
}
