use std::path::PathBuf;

use super::*;
use crate::source::SourceFile;

fn file() -> SourceFile {
    SourceFile::from_bytes(PathBuf::from("t.cpp"), b"ab\ncd\n".to_vec()).unwrap()
}

#[test]
fn positions_computed_from_offsets() {
    let diag = Diagnostic::new("lex", Severity::Style, &file(), 3, 5, "msg");
    assert_eq!((diag.line, diag.col), (2, 1));
    assert_eq!((diag.end_line, diag.end_col), (2, 3));
    assert!(diag.fix.is_none());
}

#[test]
fn file_level_points_at_start() {
    let diag = Diagnostic::file_level("io", Severity::Warning, "unreadable");
    assert_eq!((diag.line, diag.col), (1, 1));
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn with_fix_and_priority() {
    let diag = Diagnostic::new("lex", Severity::Style, &file(), 0, 1, "msg")
        .with_fix(Edit::new(0, 1, "x"))
        .with_priority(7);
    assert_eq!(diag.fix.as_ref().unwrap().replacement, "x");
    assert_eq!(diag.priority, 7);
}

#[test]
fn edit_overlap() {
    assert!(Edit::new(0, 2, "").overlaps(&Edit::new(1, 3, "")));
    assert!(!Edit::new(0, 2, "").overlaps(&Edit::new(2, 4, "")));
    // Zero-width insertions overlap only when strictly inside a range.
    assert!(Edit::new(2, 2, "x").overlaps(&Edit::new(0, 4, "")));
    assert!(!Edit::new(2, 2, "x").overlaps(&Edit::new(2, 4, "")));
}

#[test]
fn severity_parses() {
    assert_eq!("style".parse::<Severity>().unwrap(), Severity::Style);
    assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
    assert!("fatal".parse::<Severity>().is_err());
}
