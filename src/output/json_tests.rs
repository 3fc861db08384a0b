use std::path::PathBuf;

use super::*;
use crate::checker::FileOutcome;
use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::source::SourceFile;

fn sample_outcome() -> FileOutcome {
    let file =
        SourceFile::from_bytes(PathBuf::from("a.cpp"), b"void* p = NULL;\n".to_vec()).unwrap();
    let diag = Diagnostic::new("R-NULLPTR", Severity::Style, &file, 10, 14, "use nullptr")
        .with_fix(Edit::new(10, 14, "nullptr"));
    FileOutcome {
        path: PathBuf::from("a.cpp"),
        diagnostics: vec![diag],
        fatal: false,
        fixed: false,
    }
}

#[test]
fn report_is_an_ordered_array() {
    let output = JsonFormatter.format(&[sample_outcome()]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry["path"], "a.cpp");
    assert_eq!(entry["line"], 1);
    assert_eq!(entry["col"], 11);
    assert_eq!(entry["endLine"], 1);
    assert_eq!(entry["endCol"], 15);
    assert_eq!(entry["rule"], "R-NULLPTR");
    assert_eq!(entry["severity"], "style");
    assert_eq!(entry["fix"]["start"], 10);
    assert_eq!(entry["fix"]["end"], 14);
    assert_eq!(entry["fix"]["replacement"], "nullptr");
}

#[test]
fn fix_omitted_when_absent() {
    let mut outcome = sample_outcome();
    outcome.diagnostics[0].fix = None;
    let output = JsonFormatter.format(&[outcome]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(value[0].get("fix").is_none());
}

#[test]
fn empty_run_is_an_empty_array() {
    let output = JsonFormatter.format(&[]).unwrap();
    assert_eq!(output.trim(), "[]");
}
