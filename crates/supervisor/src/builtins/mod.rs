// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process built-in tasks.
//!
//! A task whose first command token matches a reserved name runs here
//! instead of spawning a child. Results are reported through the same
//! error channel as subprocess failures.

mod artifacts;
mod download;
mod extract;

pub use artifacts::ExtractionMode;

use gpm_core::{Artifacts, Flags};
use parking_lot::Mutex;

use crate::error::BuiltinError;
use crate::logger::Logger;

/// Reserved task names and the artifact set they operate on.
pub struct Builtins {
    /// Name that triggers the artifact pull.
    pub download: String,
    /// Name that triggers the artifact prune.
    pub remove: String,
    artifacts: Mutex<Artifacts>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self {
            download: "gpm:pull".to_string(),
            remove: "gpm:prune".to_string(),
            artifacts: Mutex::new(Artifacts::default()),
        }
    }
}

impl Builtins {
    /// Install the artifact set from the loaded taskfile.
    pub fn set_artifacts(&self, artifacts: Artifacts) {
        *self.artifacts.lock() = artifacts;
    }

    pub fn matches(&self, name: &str) -> bool {
        name == self.download || name == self.remove
    }

    /// Run the built-in `name` refers to, or `None` when it is not one.
    pub async fn run(
        &self,
        logger: &Logger,
        name: &str,
        flags: &Flags,
    ) -> Option<Result<(), BuiltinError>> {
        if name == self.download {
            let pull = self.artifacts.lock().pull.clone();
            return Some(ExtractionMode::Immediately.download(logger, &pull, flags).await);
        }
        if name == self.remove {
            let prune = self.artifacts.lock().prune.clone();
            return Some(artifacts::prune(logger, &prune).await);
        }
        None
    }
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
