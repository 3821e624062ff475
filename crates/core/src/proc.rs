// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime proc records and the ordered registry.
//!
//! A `ProcInfo` is created per task at taskfile load and lives for the
//! supervisor's lifetime. Its mutable runtime state sits behind a per-record
//! mutex; every child exit bumps an exit generation observable through a
//! watch channel, which stands in for the condition variable in the
//! classic supervisor shape: subscribe under the lock, then await the bump.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;

/// Static configuration for one proc, captured at registry build.
#[derive(Debug, Clone, Default)]
pub struct ProcSpec {
    pub name: String,
    pub desc: String,
    pub aliases: Vec<String>,
    pub cmdline: Vec<String>,
    pub env: IndexMap<String, Vec<String>>,
    pub steps: Vec<String>,
    pub dir: String,
    pub fork: bool,
    pub silent: bool,
    pub port: u16,
    pub set_port: bool,
    pub color_index: usize,
    pub restart_on_error: bool,
    pub inherit_stdin: bool,
}

/// Mutable runtime state, guarded by the record's mutex.
#[derive(Debug, Default)]
pub struct ProcState {
    /// Pid of the live child; `None` when not running.
    pub child_pid: Option<u32>,
    /// Set by the supervisor before terminating, so a nonzero exit is not
    /// treated as the child's fault.
    pub stopped_by_supervisor: bool,
    /// Error from the most recent wait, if any.
    pub wait_err: Option<String>,
    /// A spawn worker owns this record (possibly between restarts).
    pub worker_active: bool,
}

/// The runtime record for one supervised task.
#[derive(Debug)]
pub struct ProcInfo {
    pub spec: ProcSpec,
    state: Mutex<ProcState>,
    exits: watch::Sender<u64>,
}

impl ProcInfo {
    pub fn new(spec: ProcSpec) -> Arc<Self> {
        let (exits, _) = watch::channel(0);
        Arc::new(Self { spec, state: Mutex::new(ProcState::default()), exits })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Lock the record's runtime state.
    pub fn state(&self) -> MutexGuard<'_, ProcState> {
        self.state.lock()
    }

    /// True while a live child exists for this record.
    pub fn running(&self) -> bool {
        self.state.lock().child_pid.is_some()
    }

    /// Subscribe to exit notifications. Subscribing before releasing the
    /// state lock guarantees the next bump is observed.
    pub fn subscribe_exits(&self) -> watch::Receiver<u64> {
        self.exits.subscribe()
    }

    /// Broadcast one child exit to all subscribers.
    pub fn notify_exit(&self) {
        self.exits.send_modify(|gen| *gen = gen.wrapping_add(1));
    }
}

/// Ordered, thread-safe collection of proc records.
///
/// `all()` returns a shallow snapshot, so iteration never holds the lock
/// and a record mutex is never acquired under the manager mutex.
#[derive(Debug, Default)]
pub struct ProcManager {
    list: Mutex<Vec<Arc<ProcInfo>>>,
}

impl ProcManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current sequence.
    pub fn all(&self) -> Vec<Arc<ProcInfo>> {
        self.list.lock().clone()
    }

    pub fn set_all(&self, list: Vec<Arc<ProcInfo>>) {
        *self.list.lock() = list;
    }

    pub fn add(&self, proc: Arc<ProcInfo>) {
        self.list.lock().push(proc);
    }

    pub fn copy_from(&self, other: &ProcManager) {
        self.set_all(other.all());
    }

    /// Find by exact name first, then by alias.
    pub fn find(&self, name: &str) -> Option<Arc<ProcInfo>> {
        let snapshot = self.all();
        if let Some(proc) = snapshot.iter().find(|p| p.spec.name == name) {
            return Some(Arc::clone(proc));
        }
        snapshot
            .iter()
            .find(|p| p.spec.aliases.iter().any(|a| a == name))
            .map(Arc::clone)
    }
}

#[cfg(test)]
#[path = "proc_tests.rs"]
mod tests;
