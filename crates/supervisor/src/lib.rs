// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gpm-supervisor: the proc state machine and its control plane.
//!
//! One spawn worker per proc drives the spawn/wait/restart cycle; the
//! supervisor's central select services the RPC mailbox, the error
//! channel, the all-done tracker, and the platform signal stream. The
//! RPC server and the per-proc line multiplexer live here too.

pub mod builtins;
mod control;
pub mod error;
pub mod logger;
pub mod platform;
mod server;
mod supervisor;

pub use builtins::{Builtins, ExtractionMode};
pub use control::Control;
pub use error::{BuiltinError, RuntimeError, ServerError, SpawnError, StopError};
pub use logger::{LogSink, Logger};
pub use platform::StopSignal;
pub use server::{serve, serve_listener, ServerCtx};
pub use supervisor::Supervisor;
