// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gpm: declarative process supervisor.

mod app;
mod commands;
mod console;
mod opts;
mod runas;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use gpm_core::{Flags, FlagsPatch};

use crate::app::App;
use crate::opts::Cli;

fn main() {
    if let Err(err) = entry() {
        eprintln!("[error] gpm: {err:#}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn entry() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version print to stdout and are not failures.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let mut flags = Flags::default();
    flags.port = gpm_wire::default_port();
    flags.overlay(&cli.opts.as_patch());
    if let Some(patch) = read_dotfile(&flags) {
        flags.overlay(&patch);
    }

    init_tracing(flags.debug);

    if !flags.base_dir.is_empty() {
        std::env::set_current_dir(&flags.base_dir)
            .with_context(|| format!("chdir {}", flags.base_dir))?;
    }

    let mut app = App::load(flags)?;

    match cli.command {
        Some(command) => commands::dispatch(&mut app, command).await,
        None => {
            // Zero positional args: the program's own basename may name
            // a runas entry.
            let invoked = runas::invoked_name().unwrap_or_default();
            let mut flags = app.flags.clone();
            match runas::resolve(&app.taskfile.runas, &invoked, &mut flags) {
                Some(args) => {
                    app.flags = flags;
                    commands::dispatch_args(&mut app, args).await
                }
                None => {
                    let _ = Cli::command().print_help();
                    Ok(())
                }
            }
        }
    }
}

/// Read the dotfile as a flags patch, resolving next to the executable
/// when `-g` includes `d`. Missing or unparseable dotfiles are skipped.
fn read_dotfile(flags: &Flags) -> Option<FlagsPatch> {
    let path = if flags.is_global('d') {
        let exe = std::env::current_exe().ok()?;
        exe.parent().unwrap_or(Path::new(".")).join(&flags.dotfile)
    } else {
        PathBuf::from(&flags.dotfile)
    };

    if !path.exists() {
        return None;
    }

    let text = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&text) {
        Ok(patch) => Some(patch),
        Err(err) => {
            eprintln!("[error] failed to read config: {err}");
            None
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
