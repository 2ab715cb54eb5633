//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for messages shown only with `--verbose`
//! - `status_success` / `status_error` for per-asset result lines
//!
//! All output goes to stderr so that filter output printed to stdout
//! can be piped into other tools.
//!
//! # Example
//!
//! ```ignore
//! log!("apply"; "processing {} assets", count);
//! debug!("css"; "rewrote {} -> {}", reference, resolved);
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let style = |p: &String| match module_lower {
        "apply" => p.bright_blue().bold().to_string(),
        "clean" => p.bright_green().bold().to_string(),
        "error" => p.bright_red().bold().to_string(),
        _ => p.bright_yellow().bold().to_string(),
    };
    prefix.if_supports_color(Stream::Stderr, style).to_string()
}

// ============================================================================
// Asset Status
// ============================================================================

/// Report a successfully processed asset (✓ prefix, green).
pub fn status_success(message: &str) {
    let symbol = "✓".if_supports_color(Stream::Stderr, |s| s.green()).to_string();
    display(&symbol, message);
}

/// Report a failed asset (✗ prefix, red) with optional detail.
pub fn status_error(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_string()
    } else {
        format!(
            "{summary}\n{}",
            detail.if_supports_color(Stream::Stderr, |d| d.dimmed())
        )
    };
    let symbol = "✗".if_supports_color(Stream::Stderr, |s| s.red()).to_string();
    display(&symbol, &message);
}

fn display(symbol: &str, message: &str) {
    let mut stderr = stderr().lock();
    writeln!(stderr, "{symbol} {message}").ok();
    stderr.flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_roundtrip() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_prefix_contains_module_name() {
        assert!(colorize_prefix("apply", "apply").contains("[apply]"));
        assert!(colorize_prefix("CSS", "css").contains("[CSS]"));
    }
}
