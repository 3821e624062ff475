// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loaded application state: resolved flags plus the taskfile registry.

use std::sync::Arc;

use anyhow::Result;
use gpm_core::{Display, Flags, ProcManager, Taskfile};
use gpm_supervisor::Builtins;

pub struct App {
    pub flags: Flags,
    pub taskfile: Taskfile,
    /// Immutable load-time proc order; selections copy from here.
    pub stored: Arc<ProcManager>,
    pub display: Arc<Display>,
    pub builtins: Arc<Builtins>,
}

impl App {
    /// Load the taskfile, build the registry, and install artifacts.
    pub fn load(mut flags: Flags) -> Result<App> {
        let taskfile = gpm_taskfile::load(&flags.taskfile, flags.is_global('f'))?;
        let procs = gpm_taskfile::build_registry(&taskfile, &mut flags)?;

        let stored = Arc::new(ProcManager::new());
        stored.set_all(procs);

        let builtins = Arc::new(Builtins::default());
        builtins.set_artifacts(taskfile.artifacts.clone());

        let display = Arc::new(Display::new(flags.log_time));

        Ok(App { flags, taskfile, stored, display, builtins })
    }
}
