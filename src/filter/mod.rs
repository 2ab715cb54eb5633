//! Asset filters.
//!
//! A filter is one stage of the asset pipeline: it takes the asset's current
//! content plus per-call context and returns the new content. The caller runs
//! filters in sequence, feeding each output into the next filter.
//!
//! ```text
//! content ──▶ TemplateFilter ──▶ CssUrlFilter ──▶ output
//!               │                   │
//!               ▼                   ▼
//!         ArtifactCache        AssetResolver
//! ```
//!
//! - [`TemplateFilter`]: compiles a template once per identity, renders the
//!   cached artifact on every call
//! - [`CssUrlFilter`]: rewrites relative `url()` references for the
//!   cache-output directory

mod context;
pub mod css;
mod error;
pub mod template;

pub use context::{FilterContext, Vars};
pub use css::CssUrlFilter;
pub use error::{ErrorKind, FilterError};
pub use template::{Compiler, CompileError, HamlCompiler, TemplateFilter};

/// A pipeline stage transforming asset content.
///
/// `apply` takes `&mut self` because filters may memoize expensive state
/// (the template compiler) across calls. Filters are not shared between
/// threads.
pub trait Filter {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Transform `content` of the asset identified by `identity`.
    ///
    /// Errors are returned to the caller as-is; a filter never hands back
    /// partial output.
    fn apply(
        &mut self,
        content: &str,
        identity: &str,
        ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError>;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(
        &mut self,
        content: &str,
        identity: &str,
        ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError> {
        (**self).apply(content, identity, ctx)
    }
}

/// Returns content unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Filter for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn apply(
        &mut self,
        content: &str,
        _identity: &str,
        _ctx: &FilterContext<'_>,
    ) -> Result<String, FilterError> {
        Ok(content.to_string())
    }
}
