// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Request from a control client to the supervisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// Start the named procs, stopping on the first error
    Start { names: Vec<String> },

    /// Stop the named procs
    Stop { names: Vec<String> },

    /// Stop every proc in the current selection
    StopAll,

    /// Restart the named procs
    Restart { names: Vec<String> },

    /// Restart every proc in the current selection
    RestartAll,

    /// List proc names in selection order
    List,

    /// Per-proc running state
    Status,
}

impl Request {
    /// Parse a `run` subcommand name into a request.
    pub fn from_command(command: &str, args: Vec<String>) -> Option<Self> {
        Some(match command {
            "start" => Request::Start { names: args },
            "stop" => Request::Stop { names: args },
            "stop-all" => Request::StopAll,
            "restart" => Request::Restart { names: args },
            "restart-all" => Request::RestartAll,
            "list" => Request::List,
            "status" => Request::Status,
            _ => return None,
        })
    }
}
