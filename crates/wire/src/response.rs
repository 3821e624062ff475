// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Response from the supervisor to a control client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// The request failed
    Error { message: String },

    /// Proc names in selection order
    List { names: Vec<String> },

    /// Per-proc running state in selection order
    Status { procs: Vec<ProcStatus> },
}

/// One proc's running state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcStatus {
    pub name: String,
    pub running: bool,
}

impl ProcStatus {
    /// Render as the classic status line: `*name` when running, ` name`
    /// otherwise.
    pub fn render(&self) -> String {
        if self.running {
            format!("*{}", self.name)
        } else {
            format!(" {}", self.name)
        }
    }
}
