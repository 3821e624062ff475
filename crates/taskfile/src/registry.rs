// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry construction: merged taskfile -> ordered proc records.

use std::sync::Arc;

use gpm_core::{platform_matches, Flags, ProcInfo, ProcSpec, COLORS};

use crate::ConfigError;

/// Build the load-time proc registry from a merged taskfile.
///
/// Tasks not matching the current platform are dropped. Each surviving
/// task gets a palette color by position and, when `set_ports` is on, a
/// port carved out of `base_port` in steps of 100 (advancing the flag's
/// counter). Fails when nothing survives filtering.
pub fn build_registry(
    taskfile: &gpm_core::Taskfile,
    flags: &mut Flags,
) -> Result<Vec<Arc<ProcInfo>>, ConfigError> {
    let mut procs = Vec::new();
    let mut index = 0usize;

    for task in &taskfile.tasks {
        if !platform_matches(&task.platforms) {
            continue;
        }

        let name = task.name.trim().to_string();
        let mut spec = ProcSpec {
            name,
            desc: task.desc.clone(),
            aliases: task.aliases.clone(),
            cmdline: task.cmd.clone(),
            env: taskfile.env.clone(),
            steps: task.steps.clone(),
            dir: task.dir.clone(),
            fork: task.fork,
            silent: task.silent,
            port: 0,
            set_port: false,
            color_index: index,
            restart_on_error: flags.restart_on_error,
            inherit_stdin: flags.inherit_stdin,
        };

        if flags.set_ports {
            spec.set_port = true;
            spec.port = flags.base_port;
            flags.base_port = flags.base_port.saturating_add(100);
        }

        procs.push(ProcInfo::new(spec));
        index = (index + 1) % COLORS.len();
    }

    if procs.is_empty() {
        return Err(ConfigError::NoTasks);
    }

    Ok(procs)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
