use serde::Serialize;

use crate::checker::FileOutcome;
use crate::diagnostics::Severity;
use crate::error::Result;

pub struct JsonFormatter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic {
    path: String,
    line: usize,
    col: usize,
    end_line: usize,
    end_col: usize,
    rule: String,
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix>,
}

#[derive(Serialize)]
struct JsonFix {
    start: usize,
    end: usize,
    replacement: String,
}

impl JsonFormatter {
    /// Serialize all diagnostics as one ordered JSON array.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn format(&self, outcomes: &[FileOutcome]) -> Result<String> {
        let entries: Vec<JsonDiagnostic> = outcomes
            .iter()
            .flat_map(|outcome| {
                outcome.diagnostics.iter().map(|diag| JsonDiagnostic {
                    path: outcome.path.display().to_string(),
                    line: diag.line,
                    col: diag.col,
                    end_line: diag.end_line,
                    end_col: diag.end_col,
                    rule: diag.rule.to_string(),
                    severity: diag.severity,
                    message: diag.message.clone(),
                    fix: diag.fix.as_ref().map(|f| JsonFix {
                        start: f.start,
                        end: f.end,
                        replacement: f.replacement.clone(),
                    }),
                })
            })
            .collect();
        let mut out = serde_json::to_string_pretty(&entries)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
