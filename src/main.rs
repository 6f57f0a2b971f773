//! coherent-preact's main application entry point.
//! Parses the command line, wires the real collaborators into the `create`
//! pipeline and prints the next steps.

use coherent_preact::{
    cli::{get_args, Command},
    create::{next_steps, Creator},
    error::{default_error_handler, Result},
    fetch::{default_cache_dir, RemoteFetcher},
    manifest::DefaultScripts,
    prompt::DialoguerPrompter,
    setup::{GitInitializer, PackageManagerInstaller},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(err) = run(args.command) {
        default_error_handler(err);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Create(args) => {
            let prompter = DialoguerPrompter::new();
            let fetcher = RemoteFetcher::new(default_cache_dir())?;
            let creator = Creator::new(
                &prompter,
                &fetcher,
                &DefaultScripts,
                &PackageManagerInstaller,
                &GitInitializer,
            );

            let outcome = creator.run(args)?;
            println!("{}", next_steps(&outcome.dest, outcome.package_manager));
        }
    }
    Ok(())
}
