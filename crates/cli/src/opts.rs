// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface.
//!
//! Every option is optional at the parser level so it can be overlaid
//! as a patch: defaults, then CLI, then the dotfile, then any matching
//! runas entry. Boolean options accept `--flag` and `--flag=false`.

use clap::{ArgAction, Args, Parser, Subcommand};
use gpm_core::FlagsPatch;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gpm", version, about = "Declarative process supervisor", max_term_width = 100)]
pub struct Cli {
    #[command(flatten)]
    pub opts: Opts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct Opts {
    /// Task file
    #[arg(short = 'f', long)]
    pub taskfile: Option<String>,

    /// Dotfile with flag defaults
    #[arg(long)]
    pub dotfile: Option<String>,

    /// Env files to load (comma separated)
    #[arg(long = "env")]
    pub envfile: Option<String>,

    /// Overload system env with local env
    #[arg(
        long = "env-overload",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub env_overload: Option<bool>,

    /// RPC port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Start an RPC server alongside the supervisor
    #[arg(
        long = "rpc-server",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub start_rpc_server: Option<bool>,

    /// Base directory to run from
    #[arg(long)]
    pub basedir: Option<String>,

    /// Base number of port
    #[arg(short = 'b', long = "base-port")]
    pub base_port: Option<u16>,

    /// Set the PORT env var for each subprocess
    #[arg(
        long = "set-ports",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub set_ports: Option<bool>,

    /// Restart a subprocess that quits with a nonzero return code
    #[arg(
        long = "restart-on-error",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub restart_on_error: Option<bool>,

    /// Exit gpm if a subprocess quits with a nonzero return code
    #[arg(
        long = "exit-on-error",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub exit_on_error: Option<bool>,

    /// Exit gpm if all subprocesses stop
    #[arg(
        long = "exit-on-stop",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub exit_on_stop: Option<bool>,

    /// Show timestamps in proc output
    #[arg(
        long = "logtime",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub log_time: Option<bool>,

    /// Use a pty for subprocess output (noop on Windows)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub pty: Option<bool>,

    /// Seconds to pace between proc starts and stops
    #[arg(long)]
    pub interval: Option<u64>,

    /// Reverse proc order when stopping
    #[arg(
        long = "reverse-on-stop",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub reverse_on_stop: Option<bool>,

    /// Inherit stdin from gpm
    #[arg(
        long = "inherit-stdin",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub inherit_stdin: Option<bool>,

    /// Resolve the dotfile (`d`) and/or taskfile (`f`) next to the executable
    #[arg(short = 'g', long)]
    pub global: Option<String>,

    /// Enable debug diagnostics
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub debug: Option<bool>,

    /// Download optional artifacts
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub optionals: Option<bool>,
}

impl Opts {
    /// The CLI options as an overlay patch.
    pub fn as_patch(&self) -> FlagsPatch {
        FlagsPatch {
            taskfile: self.taskfile.clone(),
            dotfile: self.dotfile.clone(),
            envfile: self.envfile.clone(),
            env_overload: self.env_overload,
            port: self.port,
            start_rpc_server: self.start_rpc_server,
            base_dir: self.basedir.clone(),
            base_port: self.base_port,
            set_ports: self.set_ports,
            restart_on_error: self.restart_on_error,
            exit_on_error: self.exit_on_error,
            exit_on_stop: self.exit_on_stop,
            log_time: self.log_time,
            pty: self.pty,
            interval: self.interval,
            reverse_on_stop: self.reverse_on_stop,
            inherit_stdin: self.inherit_stdin,
            global: self.global.clone(),
            debug: self.debug,
            optionals: self.optionals,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a minimal command console
    Console,

    /// Show entries in the taskfile
    Check,

    /// Export the apps to another process manager (upstart)
    Export { format: String, location: PathBuf },

    /// Run a command against the RPC server
    /// (start, stop, stop-all, restart, restart-all, list, status)
    Run {
        command: String,
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Start the named procs under supervision
    Start { names: Vec<String> },

    /// Run a runas process
    Runas { name: Option<String> },

    /// Display the gpm version
    Version,
}

#[cfg(test)]
#[path = "opts_tests.rs"]
mod tests;
