//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for messages that only show up with `--verbose`
//! - `RunSummary` for the one-line report printed after a revision run
//!
//! # Example
//!
//! ```ignore
//! log!("rev"; "revisioning {} files", count);
//! debug!("hash"; "propagation converged after {} passes", passes);
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
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

/// Log a message with a colored module prefix.
///
/// Errors and warnings go to stderr, everything else to stdout.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();

    if matches!(module_lower.as_str(), "error" | "warning") {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stderr);
        let mut err = stderr().lock();
        writeln!(err, "{prefix} {message}").ok();
        err.flush().ok();
    } else {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stdout);
        let mut out = stdout().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    }
}

/// Apply color to a module prefix based on module type.
///
/// Plain text when `stream` is not a color terminal or `--color never` is set.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str, stream: Stream) -> String {
    let style = match module_lower {
        "rev" => Style::new().bright_blue(),
        "write" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    }
    .bold();
    format!("[{module}]")
        .if_supports_color(stream, |p| p.style(style))
        .to_string()
}

// ============================================================================
// Run Summary
// ============================================================================

/// One-line summary of a revision run.
///
/// Displays: `[rev] 42 assets: 38 renamed, 4 ignored, 117 references rewritten`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub assets: usize,
    pub renamed: usize,
    pub ignored: usize,
    pub references: usize,
}

impl RunSummary {
    /// Print the summary under the `rev` prefix.
    pub fn print(&self) {
        let line = format!(
            "{} asset{}: {} renamed, {} ignored, {} reference{} rewritten",
            self.assets,
            plural(self.assets),
            self.renamed.if_supports_color(Stream::Stdout, |n| n.green()),
            self.ignored.if_supports_color(Stream::Stdout, |n| n.dimmed()),
            self.references,
            plural(self.references),
        );
        log("rev", &line);
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
