//! User input and interaction handling.
//! Completes partially specified `create` invocations by asking the user.

use crate::cli::CreateArgs;
use crate::constants::CLI_NAME;
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use log::{info, warn};
use std::path::PathBuf;

/// Asks the user for values.
pub trait Prompter {
    /// Asks for a line of text.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(|e| Error::PromptError(e.to_string()))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

fn ask_required(prompter: &dyn Prompter, prompt: &str) -> Result<String> {
    loop {
        let answer = prompter.input(prompt, None)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Asks for everything a `create` invocation left out.
///
/// Does nothing when both the template and the destination were given.
/// Otherwise asks for each missing value, then for every flag.
pub fn fill_missing_args(prompter: &dyn Prompter, mut args: CreateArgs) -> Result<CreateArgs> {
    if !args.is_incomplete() {
        return Ok(args);
    }

    warn!("Insufficient command arguments! Prompting...");
    info!("Alternatively, run `{CLI_NAME} create --help` for usage info.");

    if args.template.is_none() {
        args.template = Some(ask_required(prompter, "Remote template to clone (user/repo#tag)")?);
    }
    if args.dest.is_none() {
        args.dest = Some(PathBuf::from(ask_required(prompter, "Directory to create the app")?));
    }
    if args.name.is_none() {
        let name = prompter.input("The name of your application", None)?;
        let name = name.trim();
        if !name.is_empty() {
            args.name = Some(name.to_string());
        }
    }

    args.force = prompter.confirm("Enforce `dest` directory; will overwrite!", args.force)?;
    args.install = prompter.confirm("Install dependencies", args.install)?;
    args.yarn = prompter.confirm("Install with `yarn` instead of `npm`", args.yarn)?;
    args.git = prompter.confirm("Initialize a `git` repository", args.git)?;

    Ok(args)
}
