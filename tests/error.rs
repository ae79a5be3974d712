// Unit tests for error handling
use mixr::error::MixError;
use std::io;

#[test]
fn test_error_from_io() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let mix_err: MixError = io_err.into();

    assert!(matches!(mix_err, MixError::Io(_)));
    assert!(mix_err.to_string().contains("I/O error"));
}

#[test]
fn test_error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let mix_err: MixError = json_err.into();
    assert!(matches!(mix_err, MixError::Json(_)));
}

#[test]
fn test_error_validation() {
    let err = MixError::validation("js() requires an output path");
    assert!(matches!(err, MixError::Validation(_)));
    assert_eq!(err.to_string(), "Invalid arguments: js() requires an output path");
}

#[test]
fn test_error_resolution() {
    let err = MixError::resolution("less: npm exited with 1");
    assert_eq!(err.to_string(), "Dependency resolution failed: less: npm exited with 1");
}

#[test]
fn test_error_task() {
    let err = MixError::task("copy", "missing source");
    assert!(matches!(err, MixError::Task { .. }));
    assert_eq!(err.to_string(), "Task 'copy' failed: missing source");
}

#[test]
fn test_error_compilation() {
    let err = MixError::compilation("webpack exited with 2");
    assert_eq!(err.to_string(), "Compilation failed: webpack exited with 2");
}

#[test]
fn test_error_pattern() {
    let err = MixError::pattern("src/[a", "unclosed class");
    assert_eq!(err.to_string(), "Invalid path pattern 'src/[a': unclosed class");
}

#[test]
fn test_error_from_string() {
    let err: MixError = "Custom error".into();
    assert!(matches!(err, MixError::Other(_)));
    assert_eq!(err.to_string(), "Custom error");

    let err: MixError = String::from("Another error").into();
    assert_eq!(err.to_string(), "Another error");
}
