use std::collections::HashSet;
use std::io::Write;

use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::error::{Result, StyleGuardError};
use crate::source::{NewlineStyle, SourceFile};

/// Edits that survived conflict resolution, plus the warnings for the ones
/// that did not.
pub struct ResolvedEdits {
    pub edits: Vec<Edit>,
    /// Rules whose edits were kept; used by the convergence guard.
    pub rules: HashSet<&'static str>,
    pub suppressed: Vec<Diagnostic>,
}

/// Resolve overlapping edits: lower priority number wins, the loser is
/// recorded as a warning.
#[must_use]
pub fn resolve_edits(file: &SourceFile, diags: &[Diagnostic]) -> ResolvedEdits {
    let mut candidates: Vec<&Diagnostic> = diags.iter().filter(|d| d.fix.is_some()).collect();
    candidates.sort_by_key(|d| {
        let fix = d.fix.as_ref().expect("filtered on fix");
        (fix.start, d.priority, fix.end)
    });

    let mut kept: Vec<&Diagnostic> = Vec::new();
    let mut suppressed = Vec::new();
    for candidate in candidates {
        let fix = candidate.fix.as_ref().expect("filtered on fix");
        let conflicts = kept
            .last()
            .is_some_and(|last| fix.overlaps(last.fix.as_ref().expect("kept have fixes")));
        if !conflicts {
            kept.push(candidate);
            continue;
        }

        let last_priority = kept.last().expect("just matched").priority;
        let (winner, loser) = if candidate.priority < last_priority {
            let last = kept.pop().expect("just matched");
            kept.push(candidate);
            (candidate, last)
        } else {
            (*kept.last().expect("just matched"), candidate)
        };
        let range = loser.fix.as_ref().expect("loser has fix");
        suppressed.push(Diagnostic::new(
            loser.rule,
            Severity::Warning,
            file,
            range.start,
            range.end,
            format!("auto-fix suppressed by {}", winner.rule),
        ));
    }

    let rules = kept.iter().map(|d| d.rule).collect();
    let edits = kept
        .into_iter()
        .map(|d| d.fix.clone().expect("kept have fixes"))
        .collect();
    ResolvedEdits {
        edits,
        rules,
        suppressed,
    }
}

/// Apply non-overlapping edits to the normalized text, in descending start
/// order so earlier offsets stay valid.
#[must_use]
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.start));

    let mut out = text.to_string();
    for edit in sorted {
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }
    out
}

/// Write the fixed file atomically, mapping edit ranges back onto the
/// original bytes so untouched line endings survive.
///
/// # Errors
/// Returns `FileWrite` if the temporary file cannot be created, written, or
/// renamed over the original.
pub fn write_fixed(file: &SourceFile, edits: &[Edit]) -> Result<()> {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.start));

    let mut bytes = file.original().to_vec();
    for edit in sorted {
        let start = file.to_original_offset(edit.start);
        let end = file.to_original_offset(edit.end);
        let replacement = match file.newline() {
            NewlineStyle::Lf => edit.replacement.clone(),
            NewlineStyle::Crlf => edit.replacement.replace('\n', "\r\n"),
        };
        bytes.splice(start..end, replacement.into_bytes());
    }

    let path = file.path();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let write_err = |source: std::io::Error| StyleGuardError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new(),
    }
    .map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.persist(path)
        .map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "fixer_tests.rs"]
mod tests;
