// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Taskfile model: the merged declarative task graph.
//!
//! A taskfile is parsed from one or more TOML documents; `Taskfile::merge`
//! folds an included document into the current one. Merge rules:
//!
//! - `includes` and `artifacts.prune` append-if-new by key
//! - `tasks`, `runas`, and `artifacts.pull` append-or-overwrite by key,
//!   keeping the existing item's position
//! - `env` maps merge with the second map winning on key collision

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::flags::FlagsPatch;
use crate::merge::{append_new_by_key, append_overwrite_by_key};

/// The merged declarative task graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taskfile {
    /// Other taskfiles to merge, in declared order.
    pub includes: Vec<String>,
    /// Environment entries for every spawned proc. Values join with the
    /// platform list separator.
    pub env: IndexMap<String, Vec<String>>,
    pub tasks: Vec<Task>,
    pub runas: Vec<Runas>,
    pub artifacts: Artifacts,
}

/// One supervised task definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub name: String,
    pub desc: String,
    pub aliases: Vec<String>,
    /// Command tokens, joined and handed to the platform shell.
    pub cmd: Vec<String>,
    /// Task names driven to completion after each exit of this task.
    pub steps: Vec<String>,
    pub dir: String,
    /// Spawn detached and do not wait for the child.
    pub fork: bool,
    /// Discard child output instead of routing it through the logger.
    pub silent: bool,
    /// OS tags this task applies to; empty means all.
    #[serde(rename = "platform")]
    pub platforms: Vec<String>,
}

/// Alias-by-program-name dispatch entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Runas {
    pub name: String,
    pub aliases: Vec<String>,
    /// Tasks substituted as positional args on match.
    pub tasks: Vec<String>,
    /// Prepend the `start` command to the substituted args.
    pub start: bool,
    /// Flag overlay applied on match; unset fields keep the active value.
    #[serde(flatten)]
    pub flags: FlagsPatch,
}

/// One artifact to download (and possibly extract).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Download {
    pub url: String,
    pub sha256: String,
    pub dir: String,
    /// Target filename; derived from the URL when empty.
    pub filename: String,
    /// Extraction root; defaults to `dir` when empty.
    pub extract: String,
    #[serde(rename = "platform")]
    pub platforms: Vec<String>,
    /// Skipped unless the optionals flag is set.
    pub optional: bool,
    /// Extract even when the extension is not a known archive type.
    pub force: bool,
}

/// One file the prune built-in may remove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneFile {
    pub name: String,
    /// When set, only remove if the on-disk hash matches.
    pub sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifacts {
    pub pull: Vec<Download>,
    pub prune: Vec<PruneFile>,
}

impl Taskfile {
    /// Merge an included taskfile into this one.
    pub fn merge(self, target: Taskfile) -> Taskfile {
        let mut env = self.env;
        for (key, value) in target.env {
            env.insert(key, value);
        }

        Taskfile {
            includes: append_new_by_key(self.includes, target.includes, |s| s.clone()),
            env,
            tasks: append_overwrite_by_key(self.tasks, target.tasks, |t| t.name.clone()),
            runas: append_overwrite_by_key(self.runas, target.runas, |r| r.name.clone()),
            artifacts: Artifacts {
                pull: append_overwrite_by_key(self.artifacts.pull, target.artifacts.pull, |d| {
                    d.url.clone()
                }),
                prune: append_new_by_key(self.artifacts.prune, target.artifacts.prune, |f| {
                    f.name.clone()
                }),
            },
        }
    }
}

#[cfg(test)]
#[path = "taskfile_tests.rs"]
mod tests;
