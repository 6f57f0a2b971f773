//! The `create` command.
//! Validates the invocation, materializes the template into the destination
//! and runs the optional setup steps, strictly in that order.

use crate::cli::CreateArgs;
use crate::error::{Error, Result};
use crate::extract::extract_template;
use crate::fetch::{ArchiveFetcher, ArchiveHandle, TemplateReference};
use crate::manifest::{exceeds_short_name_limit, normalize_package_name, Manifest, ScriptsProvider};
use crate::prompt::{fill_missing_args, Prompter};
use crate::setup::{DependencyInstaller, PackageManager, VersionControl};
use crate::substitute::Substitutions;
use crate::validate::validate_package_name;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a successful run produced.
#[derive(Debug)]
pub struct Outcome {
    /// Destination as given by the user.
    pub dest: PathBuf,
    /// Absolute project root.
    pub target: PathBuf,
    pub package_manager: PackageManager,
    /// Files that were eligible for substitution.
    pub kept_files: usize,
    /// Files whose content changed during substitution.
    pub substituted_files: usize,
    /// Non-fatal conditions reported during the run.
    pub advisories: Vec<String>,
}

/// Checks that the destination may be written to.
///
/// An existing directory is only accepted with `force` and after the user
/// confirms it.
pub fn check_target(prompter: &dyn Prompter, target: &Path, force: bool) -> Result<()> {
    if !target.is_dir() {
        return Ok(());
    }
    if !force {
        return Err(Error::OutputDirectoryExists { output_dir: target.display().to_string() });
    }
    if prompter.confirm("You are using '--force'. Do you wish to continue?", false)? {
        info!("Initializing project in the current directory!");
        Ok(())
    } else {
        Err(Error::ForceDeclined)
    }
}

/// The application name: `--name`, or the destination directory's name.
pub fn resolve_app_name(name: Option<&str>, dest: &Path, target: &Path) -> String {
    if let Some(name) = name {
        return name.to_string();
    }
    dest.file_name()
        .or_else(|| target.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Rejects names that break package naming rules, listing every violation.
pub fn check_app_name(name: &str) -> Result<()> {
    let violations = validate_package_name(name);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidName { name: name.to_string(), violations })
    }
}

/// Instructions printed once the project is ready.
pub fn next_steps(dest: &Path, package_manager: PackageManager) -> String {
    let pfx = package_manager.run_prefix();
    format!(
        "To get started, cd into the new directory:\n  {}\n\n\
         To start a development live-reload server:\n  {}\n\n\
         To create a production build (in ./build):\n  {}\n",
        style(format!("cd {}", dest.display())).green(),
        style(format!("{pfx} start")).green(),
        style(format!("{pfx} build")).green(),
    )
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
        spinner.set_style(template);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Runs `create` against a set of collaborators.
pub struct Creator<'a> {
    prompter: &'a dyn Prompter,
    fetcher: &'a dyn ArchiveFetcher,
    scripts: &'a dyn ScriptsProvider,
    installer: &'a dyn DependencyInstaller,
    vcs: &'a dyn VersionControl,
}

impl<'a> Creator<'a> {
    pub fn new(
        prompter: &'a dyn Prompter,
        fetcher: &'a dyn ArchiveFetcher,
        scripts: &'a dyn ScriptsProvider,
        installer: &'a dyn DependencyInstaller,
        vcs: &'a dyn VersionControl,
    ) -> Self {
        Self { prompter, fetcher, scripts, installer, vcs }
    }

    /// Creates a project from `args`.
    ///
    /// # Flow
    /// 1. Completes missing arguments interactively
    /// 2. Checks the destination and the application name
    /// 3. Fetches and extracts the template
    /// 4. Substitutes placeholders and patches the manifests
    /// 5. Installs dependencies and initializes git when asked to
    ///
    /// Files written before a later failure are left in place.
    pub fn run(&self, args: CreateArgs) -> Result<Outcome> {
        let args = fill_missing_args(self.prompter, args)?;
        let (Some(template), Some(dest)) = (args.template.as_deref(), args.dest.as_deref()) else {
            return Err(Error::PromptError("a template and a destination are required".into()));
        };

        let cwd = std::path::absolute(&args.cwd)?;
        let target = cwd.join(dest);
        let package_manager = PackageManager::select(args.yarn);
        debug!("Creating project in '{}' with {:?}", target.display(), package_manager);

        check_target(self.prompter, &target, args.force)?;

        let reference = TemplateReference::resolve(template)?;
        let name = resolve_app_name(args.name.as_deref(), dest, &target);
        check_app_name(&name)?;

        let archive = self.fetcher.fetch(&reference)?;

        let spinner = new_spinner();
        spinner.set_message("Creating project");
        let result = self.materialize(&reference, archive, &target, &name, package_manager, &spinner);
        spinner.finish_and_clear();
        let (kept_files, substituted_files, advisories) = result?;

        if args.install {
            let spinner = new_spinner();
            spinner.set_message("Installing dependencies");
            let installed = self.installer.install(&target, package_manager);
            spinner.finish_and_clear();
            installed?;
        }

        info!("Done!");

        if args.git {
            self.vcs.init(&target)?;
        }

        Ok(Outcome {
            dest: dest.to_path_buf(),
            target,
            package_manager,
            kept_files,
            substituted_files,
            advisories,
        })
    }

    fn materialize(
        &self,
        reference: &TemplateReference,
        archive: ArchiveHandle,
        target: &Path,
        name: &str,
        package_manager: PackageManager,
        spinner: &ProgressBar,
    ) -> Result<(usize, usize, Vec<String>)> {
        let keeps = extract_template(archive, target)?;
        if keeps.is_empty() {
            return Err(Error::MissingTemplateDirectory { repo: reference.repo().to_string() });
        }

        let substitutions =
            Substitutions::from_values(|key| if key == "name" { Some(name) } else { None });
        let substituted = substitutions.apply_to_files(&keeps)?;
        debug!(
            "Applied {} substitutions, {} of {} files changed",
            substitutions.len(),
            substituted,
            keeps.len()
        );

        let mut advisories = Vec::new();

        spinner.set_message("Parsing `package.json` file");
        let mut package = Manifest::find_package(target)?;
        match package.as_mut() {
            Some(package) => {
                package.ensure_scripts(self.scripts, target, package_manager);
                spinner.set_message("Updating `name` within `package.json` file");
                package.set_str("name", &normalize_package_name(name));
            }
            None => {
                let advisory = "Could not locate `package.json` file!".to_string();
                spinner.suspend(|| warn!("{advisory}"));
                advisories.push(advisory);
            }
        }

        if let Some(mut manifest) = Manifest::find_app(target)? {
            spinner.set_message("Updating `name` within `manifest.json` file");
            manifest.set_str("name", name);
            manifest.set_str("short_name", name);
            manifest.save()?;
            if exceeds_short_name_limit(name) {
                let advisory = "Your `short_name` should be fewer than 12 characters.".to_string();
                spinner.suspend(|| warn!("{advisory}"));
                advisories.push(advisory);
            }
        }

        if let Some(package) = package.as_mut() {
            package.save()?;
        }

        Ok((keeps.len(), substituted, advisories))
    }
}
