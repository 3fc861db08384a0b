use serde::Serialize;

use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Style,
    Warning,
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "style" => Ok(Self::Style),
            "warning" => Ok(Self::Warning),
            _ => Err(format!("Unknown severity: {s}")),
        }
    }
}

/// A byte-range replacement in the normalized source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    #[must_use]
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub rule: &'static str,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub message: String,
    pub fix: Option<Edit>,
    /// Copied from the emitting rule; lower numbers win edit conflicts.
    pub priority: u8,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        rule: &'static str,
        severity: Severity,
        file: &SourceFile,
        start: usize,
        end: usize,
        message: impl Into<String>,
    ) -> Self {
        let (line, col) = file.position(start);
        let (end_line, end_col) = file.position(end);
        Self {
            rule,
            severity,
            start,
            end,
            line,
            col,
            end_line,
            end_col,
            message: message.into(),
            fix: None,
            priority: u8::MAX,
        }
    }

    /// A diagnostic about the file as a whole (I/O failures, encoding).
    #[must_use]
    pub fn file_level(rule: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity,
            start: 0,
            end: 0,
            line: 1,
            col: 1,
            end_line: 1,
            end_col: 1,
            message: message.into(),
            fix: None,
            priority: u8::MAX,
        }
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Edit) -> Self {
        self.fix = Some(fix);
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
