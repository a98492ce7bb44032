//! Tests for error types

use std::path::PathBuf;

use regsweep::descriptor::ExperimentDescriptor;
use regsweep::Error;

#[test]
fn test_report_unavailable_error() {
    let error = Error::ReportUnavailable {
        command: "./fgr -p a.ply -q b.ply".to_string(),
        path: PathBuf::from("/tmp/report_ABC123_0.json"),
        source: Box::new(Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound))),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("\"./fgr -p a.ply -q b.ply\" did not produce any result"));
    assert!(error_str.contains("/tmp/report_ABC123_0.json"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_unsupported_output_error() {
    let error = Error::UnsupportedOutput("out.csv".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Output extension not supported"));
    assert!(error_str.contains("out.csv"));
}

#[test]
fn test_matrix_shape_error() {
    let error = Error::MatrixShape {
        context: "report transformation".to_string(),
        rows: 3,
        cols: 4,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("report transformation"));
    assert!(error_str.contains("3 row(s) x 4 column(s)"));
}

#[test]
fn test_invalid_number_error() {
    let error = Error::InvalidNumber {
        context: "dataset sigma".to_string(),
        value: "high".to_string(),
    };
    assert_eq!(format!("{error}"), "dataset sigma: 'high' is not a number");
}

#[test]
fn test_additional_flags_error() {
    let error = Error::AdditionalFlags("--label \"open".to_string());
    assert_eq!(
        format!("{error}"),
        "Additional flags have unbalanced quoting: --label \"open"
    );
}

#[test]
fn test_descriptor_load_missing_file() {
    let error = ExperimentDescriptor::load("/nonexistent/descriptor.json").unwrap_err();
    assert!(matches!(error, Error::Descriptor { .. }));
    assert!(format!("{error}").contains("/nonexistent/descriptor.json"));
}

#[test]
fn test_descriptor_load_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descriptor.json");
    std::fs::write(&path, r#"{"name": "x", "parameters": 3}"#).unwrap();

    let error = ExperimentDescriptor::load(&path).unwrap_err();
    match error {
        Error::Descriptor { source, .. } => assert!(matches!(*source, Error::Json(_))),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: Error = io_error.into();
    assert!(format!("{error}").contains("IO error"));
}
