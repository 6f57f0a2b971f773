//! Error handling for coherent-preact.
//! Defines the error type and result alias used throughout the application.

use std::io;
use thiserror::Error;

/// Errors that halt project creation.
///
/// Every variant is fatal: it stops the pipeline where it was detected and is
/// reported once through [`default_error_handler`]. Advisory conditions are
/// logged as warnings instead and never become an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// The application name breaks one or more package naming rules.
    #[error("{}", format_invalid_name(.name, .violations))]
    InvalidName { name: String, violations: Vec<String> },

    #[error("Refusing to overwrite current directory! Please specify a different destination or use the `--force` flag: {output_dir}")]
    OutputDirectoryExists { output_dir: String },

    #[error("Refusing to overwrite current directory!")]
    ForceDeclined,

    #[error("Invalid template reference: {0}")]
    InvalidTemplateReference(String),

    #[error("Could not find repository: {repo}")]
    RepositoryNotFound { repo: String },

    #[error("An error occurred while fetching template: {0}")]
    FetchError(String),

    /// The archive contained no usable file below a `template/` directory.
    #[error("No `template` directory found within {repo}!")]
    MissingTemplateDirectory { repo: String },

    #[error("Could not parse `{path}`: {source}")]
    ManifestError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to install dependencies: {0}")]
    InstallError(String),

    #[error("Git error: {0}")]
    GitError(#[from] git2::Error),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_invalid_name(name: &str, violations: &[String]) -> String {
    std::iter::once(format!("Invalid package name: {name}"))
        .chain(violations.iter().cloned())
        .map(|line| capitalize(&line))
        .collect::<Vec<_>>()
        .join("\n  ~ ")
}

/// Prints the error to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
