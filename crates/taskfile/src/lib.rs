// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gpm-taskfile: taskfile loading, include resolution, and registry build.
//!
//! Parses TOML taskfile documents into the [`gpm_core::Taskfile`] model,
//! folds the include chain (transitive, deduplicated by path), and turns
//! the merged result into the ordered proc registry the supervisor runs.

mod loader;
mod registry;

pub use loader::{load, resolve_path};
pub use registry::build_registry;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from taskfile loading and registry construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("taskfile not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("no valid entry")]
    NoTasks,

    #[error("cannot locate executable for global lookup: {0}")]
    Executable(#[source] std::io::Error),
}
