// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows spawn attributes and console-event termination.

use std::io;

use tokio::process::Command;
use tokio::sync::mpsc;
use windows::Win32::System::Console::{
    AttachConsole, GenerateConsoleCtrlEvent, SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_C_EVENT,
};
use windows::Win32::System::Threading::{
    OpenProcess, TerminateProcess, CREATE_NEW_PROCESS_GROUP, CREATE_UNICODE_ENVIRONMENT,
    DETACHED_PROCESS, PROCESS_TERMINATE,
};

use super::StopSignal;

/// Shell invocation prefix; the joined cmdline becomes the `/c` operand.
pub const SHELL: &[&str] = &["cmd", "/c"];

/// Separator for joining multi-valued env entries.
pub const LIST_SEPARATOR: &str = ";";

/// Apply spawn attributes.
///
/// Children always get their own process group with a Unicode
/// environment; fork mode additionally detaches from the console.
pub fn configure_command(cmd: &mut Command, fork: bool) {
    let flags = if fork {
        CREATE_NEW_PROCESS_GROUP.0 | DETACHED_PROCESS.0
    } else {
        CREATE_UNICODE_ENVIRONMENT.0 | CREATE_NEW_PROCESS_GROUP.0
    };
    cmd.creation_flags(flags);
}

/// Deliver CTRL_BREAK then CTRL_C to the child's console.
///
/// The supervisor attaches to the child's console and disables its own
/// Ctrl handler first, so the events reach only the child.
#[allow(unsafe_code)]
pub fn terminate(pid: u32, _sig: StopSignal) -> io::Result<()> {
    // SAFETY: plain Win32 console calls; no pointers cross the boundary
    // besides the null handler routine.
    unsafe {
        if let Err(e) = AttachConsole(pid) {
            // Access denied means we already share the console.
            if e.code() != windows::Win32::Foundation::E_ACCESSDENIED {
                return Err(io::Error::other(e));
            }
        }
        SetConsoleCtrlHandler(None, true.into()).map_err(io::Error::other)?;
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid).map_err(io::Error::other)?;
        GenerateConsoleCtrlEvent(CTRL_C_EVENT, pid).map_err(io::Error::other)?;
    }
    Ok(())
}

/// Hard-terminate the child process.
#[allow(unsafe_code)]
pub fn kill(pid: u32) -> io::Result<()> {
    // SAFETY: handle is closed by the owned RAII wrapper on drop.
    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, false.into(), pid).map_err(io::Error::other)?;
        let result = TerminateProcess(handle, 1).map_err(io::Error::other);
        let _ = windows::Win32::Foundation::CloseHandle(handle);
        result
    }
}

/// Stream of termination requests: interrupt only.
pub fn signal_channel() -> io::Result<mpsc::Receiver<StopSignal>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;

    let (tx, rx) = mpsc::channel(10);
    tokio::spawn(async move {
        while ctrl_c.recv().await.is_some() {
            if tx.send(StopSignal::Interrupt).await.is_err() {
                return;
            }
        }
    });
    Ok(rx)
}

/// Pseudoterminal support is not available on this platform.
pub const PTY_SUPPORTED: bool = false;
