//! Patching of the generated project's JSON manifests.
//! `package.json` receives the normalized package name and, when missing, a
//! default set of scripts; the first `manifest.json` found receives the
//! display name.

use crate::constants::{APP_MANIFEST, CLI_NAME, PACKAGE_MANIFEST, SHORT_NAME_LIMIT};
use crate::error::{Error, Result};
use crate::setup::PackageManager;
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Lower-cases `name` and replaces whitespace runs with underscores.
pub fn normalize_package_name(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "_").into_owned()
}

/// Returns true when `name` is too long to be shown untruncated as a short name.
pub fn exceeds_short_name_limit(name: &str) -> bool {
    name.chars().count() > SHORT_NAME_LIMIT
}

/// Computes the `scripts` of a package manifest that has none.
pub trait ScriptsProvider {
    /// # Arguments
    /// * `manifest` - The parsed package manifest
    /// * `target` - Root of the generated project
    /// * `package_manager` - Package manager the project will be run with
    fn scripts(
        &self,
        manifest: &Map<String, Value>,
        target: &Path,
        package_manager: PackageManager,
    ) -> Map<String, Value>;
}

/// Scripts that drive the project through this CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScripts;

impl ScriptsProvider for DefaultScripts {
    fn scripts(
        &self,
        manifest: &Map<String, Value>,
        target: &Path,
        package_manager: PackageManager,
    ) -> Map<String, Value> {
        // Templates without the standard `src/` layout keep sources at the root.
        let src = if target.join("src").is_dir() { "" } else { " --src ." };
        let has_jest = manifest
            .get("devDependencies")
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key("jest"));

        let mut scripts = Map::new();
        scripts.insert("build".into(), Value::String(format!("{CLI_NAME} build{src}")));
        scripts.insert("dev".into(), Value::String(format!("{CLI_NAME} watch{src}")));
        scripts.insert(
            "start".into(),
            Value::String(format!("{} dev", package_manager.run_prefix())),
        );
        if has_jest {
            scripts.insert("test".into(), Value::String("jest".into()));
        }
        scripts
    }
}

/// A JSON object manifest loaded from disk.
///
/// Changes stay in memory until [`Manifest::save`], which only touches the
/// file when the object differs from what was read.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    data: Map<String, Value>,
    original: Map<String, Value>,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    /// * `Error::ManifestError` if the file is not a JSON object
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let data: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| Error::ManifestError {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self { path, original: data.clone(), data })
    }

    /// Loads `<target>/package.json` if it exists.
    pub fn find_package<P: AsRef<Path>>(target: P) -> Result<Option<Self>> {
        let path = target.as_ref().join(PACKAGE_MANIFEST);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Loads the first `manifest.json` found below `target`.
    pub fn find_app<P: AsRef<Path>>(target: P) -> Result<Option<Self>> {
        let found = WalkDir::new(target.as_ref())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable path while looking for {APP_MANIFEST}: {e}");
                    None
                }
            })
            .find(|entry| entry.file_type().is_file() && entry.file_name() == APP_MANIFEST);

        match found {
            Some(entry) => {
                debug!("Found app manifest '{}'", entry.path().display());
                Self::load(entry.into_path()).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Fills in `scripts` from `provider` when the manifest has none.
    pub fn ensure_scripts(
        &mut self,
        provider: &dyn ScriptsProvider,
        target: &Path,
        package_manager: PackageManager,
    ) {
        if self.data.contains_key("scripts") {
            return;
        }
        let scripts = provider.scripts(&self.data, target, package_manager);
        self.data.insert("scripts".to_string(), Value::Object(scripts));
    }

    pub fn is_modified(&self) -> bool {
        self.data != self.original
    }

    /// Writes the manifest back with two-space indentation if it changed.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the file was rewritten
    pub fn save(&mut self) -> Result<bool> {
        if !self.is_modified() {
            debug!("'{}' unchanged", self.path.display());
            return Ok(false);
        }
        let content = serde_json::to_string_pretty(&self.data).map_err(|source| {
            Error::ManifestError { path: self.path.display().to_string(), source }
        })?;
        fs::write(&self.path, content)?;
        self.original = self.data.clone();
        Ok(true)
    }
}
