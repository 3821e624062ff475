// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Taskfile parsing and include resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gpm_core::Taskfile;

use crate::ConfigError;

/// Resolve a taskfile path, either against the working directory or,
/// when `global` is set, next to the running executable.
pub fn resolve_path(path: &str, global: bool) -> Result<PathBuf, ConfigError> {
    let candidate = if global {
        let exe = std::env::current_exe().map_err(ConfigError::Executable)?;
        exe.parent().unwrap_or(Path::new(".")).join(path)
    } else {
        PathBuf::from(path)
    };

    if !candidate.exists() {
        return Err(ConfigError::Missing(candidate));
    }

    tracing::debug!(path = %candidate.display(), global, "using taskfile");
    Ok(candidate)
}

fn parse_file(path: &Path) -> Result<Taskfile, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source: Box::new(source) })
}

/// Load a taskfile and fold its include chain.
///
/// Includes resolve transitively: a merged document's own includes are
/// queued behind the ones already pending, each loaded at most once.
/// Include paths resolve with the same global rule as the root.
pub fn load(path: &str, global: bool) -> Result<Taskfile, ConfigError> {
    let root_path = resolve_path(path, global)?;
    let mut merged = parse_file(&root_path)?;

    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(root_path);

    let mut queue: Vec<String> = merged.includes.clone();
    let mut next = 0;
    while next < queue.len() {
        let include = queue[next].clone();
        next += 1;

        let include_path = resolve_path(&include, global)?;
        if !visited.insert(include_path.clone()) {
            continue;
        }

        let document = parse_file(&include_path)?;
        for nested in &document.includes {
            if !queue.contains(nested) {
                queue.push(nested.clone());
            }
        }
        merged = merged.merge(document);
    }

    Ok(merged)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
