// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Formats errors with their hints, result metadata and the compression count

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use way2enjoy_sdk::{ImageResult, ResultMeta, Way2enjoyError};

/// Centralized CLI output utilities for consistent formatting
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal(),
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Display an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "error:".red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    /// Display an informational message
    pub fn info(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "info:".blue().bold(), message);
        } else {
            eprintln!("info: {}", message);
        }
    }

    /// Display a success message
    pub fn success(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "success:".green().bold(), message);
        } else {
            eprintln!("success: {}", message);
        }
    }

    /// Display a hint line under an error
    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("  {} {}", "hint:".dimmed(), message);
        } else {
            eprintln!("  hint: {}", message);
        }
    }

    /// Report a failed run, with the SDK hint when there is one
    pub fn report(&self, err: &anyhow::Error) {
        self.error(&format!("{:#}", err));
        if let Some(hint) = err
            .downcast_ref::<Way2enjoyError>()
            .and_then(Way2enjoyError::help_text)
        {
            self.hint(hint);
        }
    }

    pub fn saved(&self, path: &Path, result: &ImageResult) {
        self.success(&format!(
            "Saved {} ({})",
            path.display(),
            describe(result.meta())
        ));
    }

    pub fn stored(&self, meta: &ResultMeta) {
        match meta.location() {
            Some(location) => self.success(&format!("Stored at {}", location)),
            None => self.success("Stored"),
        }
    }

    pub fn compression_count(&self, count: Option<u64>) {
        match count {
            Some(count) => self.info(&format!("Compressions this month: {}", count)),
            None => log::debug!("No compression count reported"),
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line summary such as `400x300, 1234 bytes, image/png`
pub fn describe(meta: &ResultMeta) -> String {
    let mut parts = Vec::new();
    match (meta.width(), meta.height()) {
        (Some(width), Some(height)) => parts.push(format!("{}x{}", width, height)),
        (Some(width), None) => parts.push(format!("width {}", width)),
        (None, Some(height)) => parts.push(format!("height {}", height)),
        (None, None) => {}
    }
    if let Some(size) = meta.size() {
        parts.push(format!("{} bytes", size));
    }
    if let Some(content_type) = meta.content_type() {
        parts.push(content_type.to_string());
    }

    if parts.is_empty() {
        "no metadata".to_string()
    } else {
        parts.join(", ")
    }
}
