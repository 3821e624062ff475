// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alias-by-program-name dispatch.
//!
//! A runas entry matches when the invoked name equals its name
//! (case-insensitive) or appears in its aliases. Matching entries
//! overlay their flags onto the active set and rewrite the positional
//! args; later matches win on both counts.

use gpm_core::{Flags, Runas};

/// Apply every matching runas entry; returns the rewritten args.
pub fn resolve(entries: &[Runas], invoked: &str, flags: &mut Flags) -> Option<Vec<String>> {
    let mut rewritten = None;

    for run in entries {
        let matched = run.name.eq_ignore_ascii_case(invoked)
            || run.aliases.iter().any(|a| a == invoked);
        if !matched {
            continue;
        }

        flags.overlay(&run.flags);

        let mut args = Vec::with_capacity(run.tasks.len() + 1);
        if run.start {
            args.push("start".to_string());
        }
        args.extend(run.tasks.iter().cloned());
        rewritten = Some(args);
    }

    tracing::debug!(invoked, matched = rewritten.is_some(), "runas resolution");
    rewritten
}

/// The name the program was invoked as.
pub fn invoked_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "runas_tests.rs"]
mod tests;
