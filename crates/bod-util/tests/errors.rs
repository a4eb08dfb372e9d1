use bod_util::errors::BodError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = BodError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_invalid_mode_lists_valid_values() {
    let err = BodError::InvalidMode {
        mode: "binry-only".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("'binry-only'"));
    assert!(msg.contains("build-on-demand"));
    assert!(msg.contains("binary-only"));
    assert!(msg.contains("source-only"));
}

#[test]
fn test_duplicate_project_names_key() {
    let err = BodError::DuplicateProject {
        key: "org.example:lib".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Project 'org.example:lib' is duplicated in build-candidate set"
    );
}

#[test]
fn test_cycle_detected_renders_path() {
    let err = BodError::CycleDetected {
        project: "org.example:a".to_string(),
        dependency: "org.example:b".to_string(),
        cycle: vec![
            "org.example:a".to_string(),
            "org.example:b".to_string(),
            "org.example:a".to_string(),
        ],
    };
    let msg = err.to_string();
    assert!(msg.contains("org.example:a -> org.example:b -> org.example:a"));
}

#[test]
fn test_resolution_error_display() {
    let err = BodError::Resolution {
        message: "Failed to resolve 2 projects".to_string(),
    };
    assert!(err.to_string().contains("Failed to resolve 2 projects"));
}
