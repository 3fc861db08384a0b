pub mod fixer;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer;
use crate::rules::{Rule, RuleContext};
use crate::source::SourceFile;
use crate::structure::{Structure, collect_include_blocks};

/// Everything the driver needs to know about one processed file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// Lexing or I/O failed; the file contributes to exit code 2.
    pub fatal: bool,
    /// Fix mode rewrote the file.
    pub fixed: bool,
}

impl FileOutcome {
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Runs the enabled rules over single files.
pub struct FileChecker<'a> {
    config: &'a Config,
    rules: Vec<&'a dyn Rule>,
}

impl<'a> FileChecker<'a> {
    /// Select the enabled rules: config enablement first, then `--rules`
    /// restricts to its list, then `--disable` subtracts.
    #[must_use]
    pub fn new(
        config: &'a Config,
        all_rules: &'a [Box<dyn Rule>],
        only: Option<&[String]>,
        disabled: &[String],
    ) -> Self {
        let rules = all_rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| {
                let id = r.id();
                let enabled = only.map_or_else(
                    || config.rule_enabled(id),
                    |list| list.iter().any(|s| s == id),
                );
                enabled && !disabled.iter().any(|s| s == id)
            })
            .collect();
        Self { config, rules }
    }

    /// Check one file from disk.
    #[must_use]
    pub fn check_path(&self, path: &Path) -> FileOutcome {
        match SourceFile::load(path) {
            Ok(file) => {
                let (diagnostics, fatal) = self.check_source(&file);
                FileOutcome {
                    path: path.to_path_buf(),
                    diagnostics,
                    fatal,
                    fixed: false,
                }
            }
            Err(e) => io_outcome(path, &e),
        }
    }

    /// Fix one file from disk, writing atomically on success.
    #[must_use]
    pub fn fix_path(&self, path: &Path) -> FileOutcome {
        let file = match SourceFile::load(path) {
            Ok(file) => file,
            Err(e) => return io_outcome(path, &e),
        };
        let (fixed_text, edits, mut diagnostics, fatal) = self.fix_source(&file);
        let mut fixed = false;
        if fixed_text.is_some() {
            match fixer::write_fixed(&file, &edits) {
                Ok(()) => fixed = true,
                Err(e) => {
                    diagnostics.push(Diagnostic::file_level(
                        "io",
                        Severity::Warning,
                        e.to_string(),
                    ));
                    return FileOutcome {
                        path: path.to_path_buf(),
                        diagnostics,
                        fatal: true,
                        fixed: false,
                    };
                }
            }
        }
        FileOutcome {
            path: path.to_path_buf(),
            diagnostics,
            fatal,
            fixed,
        }
    }

    /// Lex, structure, and run the rules over one source.
    /// Returns the sorted diagnostics and whether a fatal lex error occurred.
    #[must_use]
    pub fn check_source(&self, file: &SourceFile) -> (Vec<Diagnostic>, bool) {
        let tokens = match lexer::lex(file) {
            Ok(tokens) => tokens,
            Err(e) => {
                let diag = Diagnostic::new(
                    "lex",
                    Severity::Warning,
                    file,
                    e.offset,
                    e.offset + 1,
                    e.kind.message(),
                );
                return (vec![diag], true);
            }
        };

        let structure = Structure::build(&tokens);
        let includes = collect_include_blocks(file, &tokens, &self.config.system_headers);
        let ctx = RuleContext::new(file, &tokens, &structure, &includes, self.config);

        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            // A rule whose internal consistency fails forfeits its output
            // for this file; the run continues.
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut out = Vec::new();
                rule.check(&ctx, &mut out);
                out
            }));
            match result {
                Ok(mut out) => {
                    for diag in &mut out {
                        if let Some(severity) = self.config.severity_override(diag.rule) {
                            diag.severity = severity;
                        }
                    }
                    diagnostics.append(&mut out);
                }
                Err(_) => diagnostics.push(Diagnostic::file_level(
                    "internal",
                    Severity::Warning,
                    format!("rule {} failed; its results were discarded", rule.id()),
                )),
            }
        }

        diagnostics.sort_by_key(|d| (d.start, d.end));
        (diagnostics, false)
    }

    /// Run a fix pass over one source. Returns the fixed text (when the
    /// convergence guard passed), the applied edits, and the diagnostics.
    #[must_use]
    pub fn fix_source(
        &self,
        file: &SourceFile,
    ) -> (Option<String>, Vec<crate::diagnostics::Edit>, Vec<Diagnostic>, bool) {
        let (mut diagnostics, fatal) = self.check_source(file);
        if fatal {
            return (None, Vec::new(), diagnostics, true);
        }

        let resolved = fixer::resolve_edits(file, &diagnostics);
        diagnostics.extend(resolved.suppressed);
        diagnostics.sort_by_key(|d| (d.start, d.end));
        if resolved.edits.is_empty() {
            return (None, Vec::new(), diagnostics, false);
        }

        let fixed = fixer::apply_edits(file.text(), &resolved.edits);

        // One re-check: a rule that contributed an edit and still fires
        // means the fix did not converge; leave the file unchanged.
        let converged = SourceFile::from_bytes(file.path().to_path_buf(), fixed.clone().into_bytes())
            .is_ok_and(|refile| {
                let (rediags, refatal) = self.check_source(&refile);
                !refatal && !rediags.iter().any(|d| resolved.rules.contains(d.rule))
            });
        if !converged {
            diagnostics.push(Diagnostic::file_level(
                "fix-convergence",
                Severity::Warning,
                "fixes did not converge; file left unchanged",
            ));
            diagnostics.sort_by_key(|d| (d.start, d.end));
            return (None, Vec::new(), diagnostics, false);
        }

        (Some(fixed), resolved.edits, diagnostics, false)
    }
}

fn io_outcome(path: &Path, error: &crate::error::StyleGuardError) -> FileOutcome {
    FileOutcome {
        path: path.to_path_buf(),
        diagnostics: vec![Diagnostic::file_level(
            "io",
            Severity::Warning,
            error.to_string(),
        )],
        fatal: true,
        fixed: false,
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
