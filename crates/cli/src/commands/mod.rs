// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

mod export;
mod run;
mod start;

use std::future::Future;
use std::pin::Pin;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};

use crate::app::App;
use crate::console;
use crate::opts::{Cli, Command};
use crate::runas;

/// Top-level dispatch; the console is only reachable from here.
pub async fn dispatch(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Console => console::run(app).await,
        other => dispatch_inner(app, other).await,
    }
}

/// Dispatch for everything the console may also invoke.
///
/// Boxed future: `runas` re-enters this with rewritten args.
pub fn dispatch_inner<'a>(
    app: &'a mut App,
    command: Command,
) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
    Box::pin(async move {
        match command {
            Command::Console => {
                let _ = Cli::command().print_help();
                Ok(())
            }
            Command::Check => check(app),
            Command::Export { format, location } => export::run(app, &format, &location),
            Command::Run { command, args } => run::invoke(&command, args, app.flags.port).await,
            Command::Start { names } => start::run(app, &names).await,
            Command::Runas { name } => {
                let invoked = match name {
                    Some(name) => name,
                    None => runas::invoked_name().unwrap_or_default(),
                };
                let mut flags = app.flags.clone();
                match runas::resolve(&app.taskfile.runas, &invoked, &mut flags) {
                    Some(args) => {
                        app.flags = flags;
                        dispatch_args(app, args).await
                    }
                    None => Ok(()),
                }
            }
            Command::Version => {
                println!("{}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    })
}

/// Parse a synthesized argument list and dispatch it.
pub async fn dispatch_args(app: &mut App, args: Vec<String>) -> Result<()> {
    let words = std::iter::once("gpm".to_string()).chain(args);
    let cli = Cli::try_parse_from(words)?;
    app.flags.overlay(&cli.opts.as_patch());

    match cli.command {
        Some(command) => dispatch_inner(app, command).await,
        None => {
            let _ = Cli::command().print_help();
            bail!("no command given");
        }
    }
}

/// Print the sorted `name[: desc]` listing for a valid taskfile.
fn check(app: &App) -> Result<()> {
    let mut keys: Vec<String> = app
        .stored
        .all()
        .iter()
        .map(|proc| {
            if proc.spec.desc.is_empty() {
                proc.name().to_string()
            } else {
                format!("{}: {}", proc.name(), proc.spec.desc)
            }
        })
        .collect();
    keys.sort();

    println!("[info] Valid taskfile detected ({})", keys.join(", "));
    Ok(())
}
