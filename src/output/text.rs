use std::fmt::Write;

use crate::checker::FileOutcome;
use crate::diagnostics::Severity;

/// Formats one file's diagnostics as `PATH:LINE:COL: [RULE] MESSAGE` lines.
///
/// Files are flushed as whole blocks so parallel workers never interleave
/// within a file.
pub struct TextFormatter {
    use_colors: bool,
}

/// ANSI color codes
mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RESET: &str = "\x1b[0m";
}

impl TextFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            use_colors: Self::should_use_colors(),
        }
    }

    #[must_use]
    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn should_use_colors() -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        std::io::IsTerminal::is_terminal(&std::io::stdout())
    }

    /// Render one file's block; empty when the file is clean.
    #[must_use]
    pub fn format_file(&self, outcome: &FileOutcome) -> String {
        let mut block = String::new();
        for diag in &outcome.diagnostics {
            let rule = if self.use_colors {
                let color = match diag.severity {
                    Severity::Style => ansi::YELLOW,
                    Severity::Warning => ansi::RED,
                };
                format!("{color}[{}]{}", diag.rule, ansi::RESET)
            } else {
                format!("[{}]", diag.rule)
            };
            let _ = writeln!(
                block,
                "{}:{}:{}: {rule} {}",
                outcome.path.display(),
                diag.line,
                diag.col,
                diag.message
            );
        }
        block
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
