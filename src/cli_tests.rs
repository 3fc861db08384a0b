use clap::Parser;

use super::*;
use crate::output::ReportFormat;

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["style-guard", "src"]).unwrap();
    assert!(!cli.fix);
    assert!(!cli.sequential);
    assert_eq!(cli.report, ReportFormat::Text);
    assert_eq!(cli.jobs, None);
    assert_eq!(cli.ext.len(), 7);
    assert!(cli.ext.contains(&".cpp".to_string()));
}

#[test]
fn rule_lists_split_on_commas() {
    let cli = Cli::try_parse_from([
        "style-guard",
        "--rules=R-NULLPTR,R-INDENT-2",
        "--disable=R-SEMI-NEWLINE",
        "src",
    ])
    .unwrap();
    assert_eq!(
        cli.rules,
        Some(vec!["R-NULLPTR".to_string(), "R-INDENT-2".to_string()])
    );
    assert_eq!(cli.disable, vec!["R-SEMI-NEWLINE".to_string()]);
}

#[test]
fn ext_list_overridable() {
    let cli = Cli::try_parse_from(["style-guard", "--ext=.h,.hpp", "src"]).unwrap();
    assert_eq!(cli.ext, vec![".h".to_string(), ".hpp".to_string()]);
}

#[test]
fn json_report_and_jobs() {
    let cli = Cli::try_parse_from(["style-guard", "--report=json", "-j4", "src"]).unwrap();
    assert_eq!(cli.report, ReportFormat::Json);
    assert_eq!(cli.jobs, Some(4));
}

#[test]
fn paths_required_without_stdin() {
    assert!(Cli::try_parse_from(["style-guard"]).is_err());
}

#[test]
fn stdin_filename_replaces_paths() {
    let cli = Cli::try_parse_from(["style-guard", "--stdin-filename=foo.cpp"]).unwrap();
    assert!(cli.paths.is_empty());
    assert_eq!(cli.stdin_filename.as_deref().unwrap().to_str(), Some("foo.cpp"));
}

#[test]
fn unknown_flag_rejected() {
    assert!(Cli::try_parse_from(["style-guard", "--frobnicate", "src"]).is_err());
}
