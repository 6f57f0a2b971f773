use clap::Parser;
use coherent_preact::cli::{Cli, Command, CreateArgs};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("coherent-preact")];
    res.extend(args.iter().map(OsString::from));
    res
}

fn parse_create(args: &[&str]) -> CreateArgs {
    let parsed = Cli::try_parse_from(make_args(args)).unwrap();
    match parsed.command {
        Command::Create(args) => args,
    }
}

#[test]
fn test_basic_args() {
    let args = parse_create(&["create", "default", "./app"]);

    assert_eq!(args.template.as_deref(), Some("default"));
    assert_eq!(args.dest, Some(PathBuf::from("./app")));
    assert_eq!(args.cwd, PathBuf::from("."));
    assert_eq!(args.name, None);
    assert!(!args.force);
    assert!(!args.yarn);
    assert!(!args.git);
    assert!(args.install);
}

#[test]
fn test_all_flags() {
    let args = parse_create(&[
        "create",
        "--cwd",
        "/tmp",
        "--name",
        "widget",
        "--force",
        "--yarn",
        "--git",
        "--no-install",
        "owner/repo",
        "app",
    ]);

    assert_eq!(args.cwd, PathBuf::from("/tmp"));
    assert_eq!(args.name.as_deref(), Some("widget"));
    assert!(args.force);
    assert!(args.yarn);
    assert!(args.git);
    assert!(!args.install);
}

#[test]
fn test_missing_positionals_are_allowed() {
    let args = parse_create(&["create"]);
    assert!(args.is_incomplete());

    let args = parse_create(&["create", "default"]);
    assert!(args.is_incomplete());

    let args = parse_create(&["create", "default", "app"]);
    assert!(!args.is_incomplete());
}

#[test]
fn test_global_verbose() {
    let parsed = Cli::try_parse_from(make_args(&["create", "-v", "default", "app"])).unwrap();
    assert!(parsed.verbose);
}

#[test]
fn test_missing_subcommand() {
    assert!(Cli::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Cli::try_parse_from(make_args(&["create", "default", "app", "extra"])).is_err());
}
