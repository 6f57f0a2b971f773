//! Command-line interface implementation for coherent-preact.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, ArgAction, Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for coherent-preact.
#[derive(Parser, Debug)]
#[command(
    name = "coherent-preact",
    author,
    version,
    about = "coherent-preact: create Preact applications from remote templates",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new application.
    Create(CreateArgs),
}

/// Arguments of the `create` subcommand.
///
/// Missing positionals are asked for interactively before anything runs.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// Remote template to clone (user/repo#tag)
    #[arg(value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Directory to create the app in
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// A directory to use instead of $PWD
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// The application's name
    #[arg(long)]
    pub name: Option<String>,

    /// Force option to create the directory for the new app
    #[arg(short, long)]
    pub force: bool,

    /// Use 'yarn' instead of 'npm'
    #[arg(long)]
    pub yarn: bool,

    /// Initialize version control using git
    #[arg(long)]
    pub git: bool,

    /// Skip installing dependencies
    #[arg(long = "no-install", action = ArgAction::SetFalse)]
    pub install: bool,
}

impl Default for CreateArgs {
    fn default() -> Self {
        Self {
            template: None,
            dest: None,
            cwd: PathBuf::from("."),
            name: None,
            force: false,
            yarn: false,
            git: false,
            install: true,
        }
    }
}

impl CreateArgs {
    /// Whether the positionals needed to start are missing.
    pub fn is_incomplete(&self) -> bool {
        self.template.is_none() || self.dest.is_none()
    }
}

/// Parses command line arguments and returns the Cli structure.
///
/// # Exits
/// * With status code 1 if no subcommand was given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Cli {
    match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingSubcommand
                    | ErrorKind::MissingRequiredArgument
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Cli::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
