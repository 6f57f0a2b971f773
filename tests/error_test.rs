use std::io;

use coherent_preact::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::RepositoryNotFound { repo: "owner/missing".to_string() };
    assert_eq!(err.to_string(), "Could not find repository: owner/missing");

    let err = Error::MissingTemplateDirectory { repo: "preactjs-templates/empty".to_string() };
    assert_eq!(
        err.to_string(),
        "No `template` directory found within preactjs-templates/empty!"
    );
}

#[test]
fn test_manifest_error_keeps_source() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = Error::ManifestError { path: "app/package.json".to_string(), source };

    assert!(err.to_string().starts_with("Could not parse `app/package.json`"));
    assert!(std::error::Error::source(&err).is_some());
}
