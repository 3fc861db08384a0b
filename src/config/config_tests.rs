use std::path::Path;

use super::*;
use crate::diagnostics::Severity;

#[test]
fn rules_enabled_by_default() {
    let config = Config::default();
    assert!(config.rule_enabled("R-INDENT-2"));
    assert!(config.severity_override("R-INDENT-2").is_none());
}

#[test]
fn rule_can_be_disabled() {
    let config = Config::parse("rule.R-NULLPTR.enabled = false\n").unwrap();
    assert!(!config.rule_enabled("R-NULLPTR"));
    assert!(config.rule_enabled("R-INDENT-2"));
}

#[test]
fn severity_override_parsed() {
    let config = Config::parse("rule.R-NAMING-MEMBER.severity = warning\n").unwrap();
    assert_eq!(
        config.severity_override("R-NAMING-MEMBER"),
        Some(Severity::Warning)
    );
}

#[test]
fn system_header_list_parsed() {
    let config = Config::parse("include.system-headers = platform.h, other.h\n").unwrap();
    assert_eq!(config.system_headers, vec!["platform.h", "other.h"]);
}

#[test]
fn allow_file_globs_match() {
    let config = Config::parse(
        "naming.allow-files = legacy/**\ncast.allow-files = vendor/**, generated/*.cpp\n",
    )
    .unwrap();
    assert!(config.naming_allowed(Path::new("legacy/deep/file.cpp")));
    assert!(!config.naming_allowed(Path::new("src/file.cpp")));
    assert!(config.cast_allowed(Path::new("generated/x.cpp")));
    assert!(!config.cast_allowed(Path::new("src/x.cpp")));
}

#[test]
fn no_allow_lists_match_nothing() {
    let config = Config::default();
    assert!(!config.naming_allowed(Path::new("a.cpp")));
    assert!(!config.cast_allowed(Path::new("a.cpp")));
}

#[test]
fn indent_size_other_than_two_warns() {
    let config = Config::parse("indent.size = 4\n").unwrap();
    assert_eq!(config.warnings.len(), 1);
    assert!(config.warnings[0].contains("not supported"));
}

#[test]
fn indent_size_two_accepted_silently() {
    let config = Config::parse("indent.size = 2\n").unwrap();
    assert!(config.warnings.is_empty());
}

#[test]
fn unknown_key_warns() {
    let config = Config::parse("shiny.new.option = 1\n").unwrap();
    assert_eq!(config.warnings.len(), 1);
    assert!(config.warnings[0].contains("unknown key"));
}

#[test]
fn malformed_line_warns() {
    let config = Config::parse("just some words\n").unwrap();
    assert_eq!(config.warnings.len(), 1);
}

#[test]
fn bad_boolean_warns() {
    let config = Config::parse("rule.R-NULLPTR.enabled = yes\n").unwrap();
    assert!(config.rule_enabled("R-NULLPTR"));
    assert_eq!(config.warnings.len(), 1);
}

#[test]
fn comments_and_blank_lines_ignored() {
    let config = Config::parse("# a comment\n\nrule.R-NULLPTR.enabled = true\n").unwrap();
    assert!(config.warnings.is_empty());
}

#[test]
fn invalid_glob_is_an_error() {
    let result = Config::parse("naming.allow-files = foo[\n");
    assert!(matches!(
        result,
        Err(crate::error::StyleGuardError::InvalidPattern { .. })
    ));
}

#[test]
fn overrides_keep_file_order() {
    let config = Config::parse(
        "rule.R-SEMI-NEWLINE.enabled = false\nrule.R-NULLPTR.enabled = false\n",
    )
    .unwrap();
    let ids: Vec<&String> = config.rules.keys().collect();
    assert_eq!(ids, vec!["R-SEMI-NEWLINE", "R-NULLPTR"]);
}
