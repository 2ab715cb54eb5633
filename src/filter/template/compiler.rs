//! Template compiler boundary.

use thiserror::Error;

/// Errors produced while compiling a template source.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The compiler produced output the renderer cannot parse.
    #[error("generated template is invalid: {0}")]
    Template(#[source] Box<handlebars::TemplateError>),
}

impl CompileError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Turns a template document into renderable (Handlebars) template source.
///
/// Implementations may keep state between calls; the owning filter builds
/// one lazily and reuses it.
pub trait Compiler {
    fn compile(&mut self, source: &str) -> Result<String, CompileError>;
}
