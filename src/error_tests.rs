use std::path::PathBuf;

use super::*;

#[test]
fn config_error_display() {
    let err = StyleGuardError::Config("bad value".to_string());
    assert_eq!(err.to_string(), "Configuration error: bad value");
}

#[test]
fn file_read_error_includes_path() {
    let err = StyleGuardError::FileRead {
        path: PathBuf::from("src/a.cpp"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert!(err.to_string().contains("src/a.cpp"));
}

#[test]
fn not_utf8_error_includes_path() {
    let err = StyleGuardError::NotUtf8 {
        path: PathBuf::from("weird.cpp"),
    };
    assert!(err.to_string().contains("weird.cpp"));
}

#[test]
fn io_error_converts() {
    fn returns_io() -> Result<()> {
        Err(std::io::Error::other("boom"))?;
        Ok(())
    }
    assert!(matches!(returns_io(), Err(StyleGuardError::Io(_))));
}
