// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control messages from RPC handlers to the supervisor loop.
//!
//! Every mutating method goes through the mailbox so it is serviced
//! serially by the central select and cannot interleave with signal
//! handling. Each message carries its own reply channel.

use tokio::sync::oneshot;

use crate::error::RuntimeError;

/// Reply channel owned by the requesting handler.
pub type Reply = oneshot::Sender<Result<(), RuntimeError>>;

/// A mutating control request.
pub enum Control {
    Start { names: Vec<String>, reply: Reply },
    Stop { names: Vec<String>, reply: Reply },
    StopAll { reply: Reply },
    Restart { names: Vec<String>, reply: Reply },
    RestartAll { reply: Reply },
}
