//! Cache-backed template filter.
//!
//! Compiles a template document once per logical filename and renders the
//! stored artifact on every call:
//!
//! ```text
//! apply(content, "views/index.haml", ctx)
//!   │
//!   ├─ <cache>/views/index.haml exists? ── yes ──┐
//!   │                                           │
//!   └─ no: compile(content) ─▶ write artifact ──┤
//!                                               ▼
//!                              render(artifact, ctx.vars())
//! ```
//!
//! The artifact's existence is the only validity check. Edits to the source
//! are not picked up until the artifact is removed (`sieve clean`).

mod compiler;
mod haml;

pub use compiler::{CompileError, Compiler};
pub use haml::HamlCompiler;

use std::path::Path;

use handlebars::Handlebars;

use crate::cache::ArtifactCache;
use crate::config::{ConfigError, Options, TEMPLATE_CACHE};
use crate::debug;

use super::{Filter, FilterContext, FilterError};

/// Compiles templates into an [`ArtifactCache`] and renders the artifacts.
///
/// The compiler is built on the first cache miss and kept for the lifetime
/// of the filter. A filter that only ever hits the cache never builds one.
pub struct TemplateFilter<C = HamlCompiler> {
    cache: ArtifactCache,
    compiler: Option<C>,
    build_compiler: Box<dyn Fn() -> C>,
    renderer: Handlebars<'static>,
}

impl TemplateFilter<HamlCompiler> {
    pub fn new(cache: ArtifactCache) -> Self {
        Self::with_compiler(cache, HamlCompiler::new)
    }

    /// Filter whose cache directory is the `template_cache` option under `root`.
    pub fn from_options(options: &Options, root: &Path) -> Result<Self, ConfigError> {
        let dir = root.join(options.get(TEMPLATE_CACHE)?);
        Ok(Self::new(ArtifactCache::new(dir)))
    }
}

impl<C: Compiler> TemplateFilter<C> {
    /// Use a custom compiler, built by `build_compiler` on first need.
    pub fn with_compiler(cache: ArtifactCache, build_compiler: impl Fn() -> C + 'static) -> Self {
        Self {
            cache,
            compiler: None,
            build_compiler: Box::new(build_compiler),
            renderer: Handlebars::new(),
        }
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Whether the compiler has been built yet.
    pub fn is_compiler_loaded(&self) -> bool {
        self.compiler.is_some()
    }

    fn compiler(&mut self) -> &mut C {
        let build = &self.build_compiler;
        self.compiler.get_or_insert_with(|| build())
    }
}

impl<C: Compiler> Filter for TemplateFilter<C> {
    fn name(&self) -> &'static str {
        "template"
    }

    fn apply(
        &mut self,
        content: &str,
        identity: &str,
        ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError> {
        let path = self
            .cache
            .path_for(identity)
            .map_err(|source| FilterError::Io {
                path: self.cache.dir().join(identity),
                source,
            })?;

        if !path.is_file() {
            debug!("template"; "compiling {}", identity);
            let compiled =
                self.compiler()
                    .compile(content)
                    .map_err(|source| FilterError::Transform {
                        identity: identity.to_string(),
                        source,
                    })?;
            self.cache
                .write(identity, &compiled)
                .map_err(|source| FilterError::Io {
                    path: path.clone(),
                    source,
                })?;
        }

        let artifact = self.cache.read(identity).map_err(|source| FilterError::Io {
            path: path.clone(),
            source,
        })?;

        self.renderer
            .render_template(&artifact, ctx.vars())
            .map_err(|source| FilterError::Render {
                path,
                source: Box::new(source),
            })
    }
}
