// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gpm-core: data model for the gpm process supervisor.
//!
//! Holds the parsed taskfile model (tasks, runas entries, artifacts),
//! the flag set and its overlay rules, the runtime proc registry, and
//! the process-wide display state shared by all proc loggers.

pub mod display;
pub mod flags;
pub mod merge;
pub mod platform;
pub mod proc;
pub mod taskfile;

pub use display::{Display, COLORS};
pub use platform::platform_matches;
pub use flags::{Flags, FlagsPatch};
pub use proc::{ProcInfo, ProcManager, ProcSpec, ProcState};
pub use taskfile::{Artifacts, Download, PruneFile, Runas, Task, Taskfile};
