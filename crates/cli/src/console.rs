// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive console: one command line per input line.
//!
//! Each line re-parses the full flag surface and overlays it onto the
//! active flags before dispatching. Errors are printed, never fatal.
//! `exit` or `q` leaves the console.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::commands;
use crate::opts::Cli;

pub async fn run(app: &mut App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("q") {
            break;
        }

        let words = std::iter::once("gpm".to_string())
            .chain(line.split_whitespace().map(str::to_string));
        let cli = match Cli::try_parse_from(words) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        app.flags.overlay(&cli.opts.as_patch());
        app.display.set_log_time(app.flags.log_time);

        match cli.command {
            Some(command) => {
                if let Err(err) = commands::dispatch_inner(app, command).await {
                    eprintln!("[error] gpm: {err:#}");
                }
            }
            None => {
                let _ = Cli::command().print_help();
            }
        }
    }

    Ok(())
}
