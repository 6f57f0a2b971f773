//! Post-generation setup: dependency installation and version control.

use crate::constants::CLI_NAME;
use crate::error::{Error, Result};
use git2::{IndexAddOption, Repository, Signature};
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

const INITIAL_COMMIT_MESSAGE: &str = "initial commit from coherent-preact";
const FALLBACK_EMAIL: &str = "coherent-preact@users.noreply.github.com";

/// Returns true if `command` can be found on `PATH`.
pub fn has_command(command: &str) -> bool {
    which::which(command).is_ok()
}

/// Package manager used to install dependencies and run scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// Picks yarn when it was requested and is installed, npm otherwise.
    pub fn select(prefer_yarn: bool) -> Self {
        if prefer_yarn && has_command("yarn") {
            Self::Yarn
        } else {
            Self::Npm
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    /// Prefix for running a package script, e.g. `npm run build`.
    pub fn run_prefix(&self) -> &'static str {
        match self {
            Self::Npm => "npm run",
            Self::Yarn => "yarn",
        }
    }
}

/// Installs the dependencies of a generated project.
pub trait DependencyInstaller {
    fn install(&self, target: &Path, package_manager: PackageManager) -> Result<()>;
}

/// Runs `<npm|yarn> install` inside the project.
#[derive(Debug, Default)]
pub struct PackageManagerInstaller;

impl DependencyInstaller for PackageManagerInstaller {
    fn install(&self, target: &Path, package_manager: PackageManager) -> Result<()> {
        let command = package_manager.command();
        debug!("Running '{command} install' in '{}'", target.display());

        let output = Command::new(command)
            .arg("install")
            .current_dir(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::InstallError(format!("could not run `{command}`: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InstallError(format!(
                "`{command} install` failed with {}\n{}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Puts a generated project under version control.
pub trait VersionControl {
    fn init(&self, target: &Path) -> Result<()>;
}

/// Creates a git repository holding the generated files in one initial commit.
#[derive(Debug, Default)]
pub struct GitInitializer;

impl VersionControl for GitInitializer {
    fn init(&self, target: &Path) -> Result<()> {
        debug!("Initializing git repository in '{}'", target.display());
        let repo = Repository::init(target)?;

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let signature = match repo.signature() {
            Ok(signature) => signature,
            Err(_) => Signature::now(CLI_NAME, FALLBACK_EMAIL)?,
        };
        repo.commit(Some("HEAD"), &signature, &signature, INITIAL_COMMIT_MESSAGE, &tree, &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_commands() {
        assert_eq!(PackageManager::Npm.run_prefix(), "npm run");
        assert_eq!(PackageManager::Yarn.run_prefix(), "yarn");
        assert_eq!(PackageManager::Yarn.command(), "yarn");
        assert_eq!(PackageManager::select(false), PackageManager::Npm);
    }
}
