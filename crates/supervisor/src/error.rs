// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the supervisor.
//!
//! Per-proc failures funnel into [`RuntimeError`] on the supervisor's
//! error channel; the RPC server never propagates a handler failure as
//! anything other than an error response.

use std::path::PathBuf;

use thiserror::Error;

/// A proc failed to start.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown proc: {0}")]
    UnknownProc(String),

    #[error("no task specified")]
    NoTask,

    #[error("failed to start {name}: {source}")]
    Start {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Termination failed at the syscall layer.
#[derive(Debug, Error)]
pub enum StopError {
    #[error("failed to signal {name}: {source}")]
    Terminate {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to kill {name}: {source}")]
    Kill {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A built-in task failed.
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("download url is empty")]
    UrlEmpty,

    #[error("download path is empty")]
    PathEmpty,

    #[error("cannot derive filename from url: {0}")]
    NoFilename(String),

    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("hash mismatch for {filename}: expected {expected}, got {actual}")]
    HashMismatch { filename: String, expected: String, actual: String },

    #[error("unsupported archive type: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    #[error("failed to extract {}: {message}", .archive.display())]
    Extract { archive: PathBuf, message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything a running proc can surface to the supervisor loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Stop(#[from] StopError),

    #[error(transparent)]
    Builtin(#[from] BuiltinError),

    /// Nonzero exit not caused by the supervisor stopping the proc.
    #[error("{name}: {status}")]
    Exited { name: String, status: String },
}

/// RPC server failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RPC server did not shut down in 10 seconds, quitting")]
    ShutdownTimeout,
}
