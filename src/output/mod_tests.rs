use super::*;

#[test]
fn default_format_is_text() {
    assert_eq!(ReportFormat::default(), ReportFormat::Text);
}
