// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for CLI parsing and patch conversion

use clap::Parser;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gpm").chain(args.iter().copied())).unwrap()
}

#[test]
fn no_args_has_no_command() {
    let cli = parse(&[]);
    assert!(cli.command.is_none());
    assert_eq!(cli.opts.as_patch(), FlagsPatch::default());
}

#[test]
fn start_collects_names() {
    let cli = parse(&["start", "web", "db"]);
    let Some(Command::Start { names }) = cli.command else {
        panic!("expected start command");
    };
    assert_eq!(names, vec!["web", "db"]);
}

#[test]
fn run_collects_method_and_args() {
    let cli = parse(&["run", "stop", "web", "db"]);
    let Some(Command::Run { command, args }) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(command, "stop");
    assert_eq!(args, vec!["web", "db"]);
}

#[yare::parameterized(
    bare = { &["--restart-on-error"], Some(true) },
    explicit_true = { &["--restart-on-error=true"], Some(true) },
    explicit_false = { &["--restart-on-error=false"], Some(false) },
    absent = { &[], None },
)]
fn bool_flags_support_explicit_false(args: &[&str], expected: Option<bool>) {
    let cli = parse(args);
    assert_eq!(cli.opts.restart_on_error, expected);
}

#[test]
fn options_survive_the_patch_roundtrip() {
    let cli = parse(&[
        "-f",
        "Other.toml",
        "-p",
        "9100",
        "--interval",
        "2",
        "--exit-on-stop=false",
        "check",
    ]);
    let patch = cli.opts.as_patch();
    assert_eq!(patch.taskfile.as_deref(), Some("Other.toml"));
    assert_eq!(patch.port, Some(9100));
    assert_eq!(patch.interval, Some(2));
    assert_eq!(patch.exit_on_stop, Some(false));
    assert_eq!(patch.envfile, None);

    let mut flags = gpm_core::Flags::default();
    flags.overlay(&patch);
    assert_eq!(flags.taskfile, "Other.toml");
    assert_eq!(flags.port, 9100);
    assert!(!flags.exit_on_stop);
}

#[test]
fn unknown_subcommand_is_a_parse_error() {
    let result = Cli::try_parse_from(["gpm", "frobnicate"]);
    assert!(result.is_err());
}

#[test]
fn export_takes_format_and_location() {
    let cli = parse(&["export", "upstart", "/tmp/out"]);
    let Some(Command::Export { format, location }) = cli.command else {
        panic!("expected export command");
    };
    assert_eq!(format, "upstart");
    assert_eq!(location, std::path::PathBuf::from("/tmp/out"));
}
