// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The active flag set and its overlay rules.
//!
//! `Flags` is the resolved configuration the supervisor runs with. A
//! `FlagsPatch` is the partial form carried by the dotfile and by runas
//! entries; overlaying a patch replaces only the fields the patch sets.

use serde::{Deserialize, Serialize};

/// Resolved supervisor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    pub taskfile: String,
    pub dotfile: String,
    /// Comma-separated dotenv files to load before starting procs.
    pub envfile: String,
    /// Overload process env with dotenv values instead of load-if-unset.
    pub env_overload: bool,
    pub port: u16,
    pub start_rpc_server: bool,
    pub base_dir: String,
    pub base_port: u16,
    pub set_ports: bool,
    pub restart_on_error: bool,
    pub exit_on_error: bool,
    pub exit_on_stop: bool,
    pub log_time: bool,
    pub pty: bool,
    /// Seconds to pace between proc starts and stops.
    pub interval: u64,
    pub reverse_on_stop: bool,
    pub inherit_stdin: bool,
    /// Which of the dotfile (`d`) and taskfile (`f`) resolve next to the
    /// executable instead of the working directory.
    pub global: String,
    pub debug: bool,
    /// Download artifacts marked optional.
    pub optionals: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            taskfile: "Taskfile.toml".to_string(),
            dotfile: ".gpm.toml".to_string(),
            envfile: ".env".to_string(),
            env_overload: false,
            port: 8555,
            start_rpc_server: true,
            base_dir: String::new(),
            base_port: 5000,
            set_ports: true,
            restart_on_error: false,
            exit_on_error: false,
            exit_on_stop: true,
            log_time: true,
            pty: false,
            interval: 0,
            reverse_on_stop: false,
            inherit_stdin: false,
            global: String::new(),
            debug: false,
            optionals: false,
        }
    }
}

impl Flags {
    /// The dotenv file list, split on commas.
    pub fn envfiles(&self) -> Vec<String> {
        self.envfile
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when `which` (e.g. `"f"` or `"d"`) is marked global.
    pub fn is_global(&self, which: char) -> bool {
        self.global.contains(which)
    }

    /// Overlay a patch, replacing only the fields the patch sets.
    pub fn overlay(&mut self, patch: &FlagsPatch) {
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = &patch.$field { self.$field = v.clone(); } )*
            };
        }
        apply!(
            taskfile,
            dotfile,
            envfile,
            env_overload,
            port,
            start_rpc_server,
            base_dir,
            base_port,
            set_ports,
            restart_on_error,
            exit_on_error,
            exit_on_stop,
            log_time,
            pty,
            interval,
            reverse_on_stop,
            inherit_stdin,
            global,
            debug,
            optionals,
        );
    }
}

/// Partial flag set; `None` fields leave the active value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlagsPatch {
    pub taskfile: Option<String>,
    pub dotfile: Option<String>,
    pub envfile: Option<String>,
    pub env_overload: Option<bool>,
    pub port: Option<u16>,
    pub start_rpc_server: Option<bool>,
    pub base_dir: Option<String>,
    pub base_port: Option<u16>,
    pub set_ports: Option<bool>,
    pub restart_on_error: Option<bool>,
    pub exit_on_error: Option<bool>,
    pub exit_on_stop: Option<bool>,
    pub log_time: Option<bool>,
    pub pty: Option<bool>,
    pub interval: Option<u64>,
    pub reverse_on_stop: Option<bool>,
    pub inherit_stdin: Option<bool>,
    pub global: Option<String>,
    pub debug: Option<bool>,
    pub optionals: Option<bool>,
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
