// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX spawn attributes, process-group signalling, and pty support.

use std::io;
use std::os::fd::OwnedFd;

use nix::sys::signal::{self, Signal};
use nix::unistd::{getpgid, Pid};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::StopSignal;

/// Shell invocation prefix; the joined cmdline becomes the `-c` operand.
pub const SHELL: &[&str] = &["/bin/sh", "-c"];

/// Separator for joining multi-valued env entries.
pub const LIST_SEPARATOR: &str = ":";

/// Apply spawn attributes.
///
/// Default spawn puts the child in its own process group so termination
/// can target the whole group. Fork mode detaches into a new session;
/// the supervisor never waits on (or reaps) such children.
pub fn configure_command(cmd: &mut Command, fork: bool) {
    if fork {
        #[allow(unsafe_code)]
        // SAFETY: setsid is async-signal-safe and called pre-exec in the child.
        unsafe {
            cmd.pre_exec(|| nix::unistd::setsid().map(|_| ()).map_err(io::Error::from));
        }
    } else {
        cmd.process_group(0);
    }
}

fn map_signal(sig: StopSignal) -> Signal {
    match sig {
        StopSignal::Interrupt => Signal::SIGINT,
        StopSignal::Terminate => Signal::SIGTERM,
        StopSignal::Hangup => Signal::SIGHUP,
    }
}

/// Send `sig` to the child; to its whole group when it leads one.
pub fn terminate(pid: u32, sig: StopSignal) -> io::Result<()> {
    let pid = Pid::from_raw(pid as i32);
    let pgid = getpgid(Some(pid)).map_err(io::Error::from)?;

    if pgid == pid {
        signal::killpg(pgid, map_signal(sig)).map_err(io::Error::from)
    } else {
        signal::kill(pid, map_signal(sig)).map_err(io::Error::from)
    }
}

/// SIGKILL the child's process group.
pub fn kill(pid: u32) -> io::Result<()> {
    signal::killpg(Pid::from_raw(pid as i32), Signal::SIGKILL).map_err(io::Error::from)
}

/// Stream of termination requests: SIGTERM, SIGINT, SIGHUP.
pub fn signal_channel() -> io::Result<mpsc::Receiver<StopSignal>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    let mut hup = signal(SignalKind::hangup())?;

    let (tx, rx) = mpsc::channel(10);
    tokio::spawn(async move {
        loop {
            let sig = tokio::select! {
                _ = term.recv() => StopSignal::Terminate,
                _ = int.recv() => StopSignal::Interrupt,
                _ = hup.recv() => StopSignal::Hangup,
            };
            if tx.send(sig).await.is_err() {
                return;
            }
        }
    });
    Ok(rx)
}

/// Pseudoterminal support is available on this platform.
pub const PTY_SUPPORTED: bool = true;

/// An open pty pair; the slave end goes to the child's stdout/stderr.
pub struct Pty {
    pub master: OwnedFd,
    pub slave: OwnedFd,
}

pub fn open_pty() -> io::Result<Pty> {
    let pair = nix::pty::openpty(None, None).map_err(io::Error::from)?;
    Ok(Pty { master: pair.master, slave: pair.slave })
}
