//! coherent-preact creates Preact applications from remote templates.
//! It fetches a template repository archive, extracts its `template/`
//! directory, fills in `{{ name }}` placeholders, patches the project
//! manifests and optionally installs dependencies and initializes git.

/// Command-line interface definitions
pub mod cli;

pub mod constants;

/// The `create` command and its pipeline
pub mod create;

/// Error types and handling
pub mod error;

/// Filtered extraction of template archives
pub mod extract;

/// Template reference resolution and archive download
pub mod fetch;

/// `package.json` and `manifest.json` patching
pub mod manifest;

/// User input and interaction handling
pub mod prompt;

/// Dependency installation and git initialization
pub mod setup;

/// `{{ key }}` placeholder substitution
pub mod substitute;

/// Package name validation
pub mod validate;
