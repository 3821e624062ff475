// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor core: spawn/wait/restart/stop per proc, plus the
//! central select that services the mailbox, the error channel, the
//! all-done tracker, and platform signals.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use gpm_core::{Display, Flags, ProcInfo, ProcManager};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::builtins::Builtins;
use crate::control::Control;
use crate::error::{RuntimeError, SpawnError, StopError};
use crate::logger::{LogSink, Logger};
use crate::platform::{self, StopSignal};

/// Grace window between the polite signal and SIGKILL.
const KILL_TIMEOUT: Duration = Duration::from_secs(10);

/// Mailbox depth; bursts of control requests queue without blocking.
const MAILBOX_DEPTH: usize = 10;

/// Owns the central loop; workers run against the shared [`Ctx`].
pub struct Supervisor {
    ctx: Arc<Ctx>,
    control_tx: mpsc::Sender<Control>,
    control_rx: mpsc::Receiver<Control>,
    err_rx: mpsc::Receiver<RuntimeError>,
}

pub(crate) struct Ctx {
    pub(crate) flags: Flags,
    pub(crate) shared: Arc<ProcManager>,
    pub(crate) stored: Arc<ProcManager>,
    pub(crate) display: Arc<Display>,
    pub(crate) builtins: Arc<Builtins>,
    pub(crate) sink: LogSink,
    err_tx: mpsc::Sender<RuntimeError>,
}

impl Supervisor {
    pub fn new(
        flags: Flags,
        shared: Arc<ProcManager>,
        stored: Arc<ProcManager>,
        display: Arc<Display>,
        builtins: Arc<Builtins>,
        sink: LogSink,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel(MAILBOX_DEPTH);
        // Depth 1 with drop-on-full: one pending failure is enough to act on.
        let (err_tx, err_rx) = mpsc::channel(1);
        Self {
            ctx: Arc::new(Ctx { flags, shared, stored, display, builtins, sink, err_tx }),
            control_tx,
            control_rx,
            err_rx,
        }
    }

    /// Mailbox sender for the RPC server.
    pub fn control_handle(&self) -> mpsc::Sender<Control> {
        self.control_tx.clone()
    }

    pub fn shared(&self) -> Arc<ProcManager> {
        Arc::clone(&self.ctx.shared)
    }

    /// Replace the shared sequence with the named selection.
    ///
    /// Also resets the logger name column to the widths of the selected
    /// procs. Fails on an empty or unknown selection.
    pub fn select(&self, names: &[String]) -> Result<(), SpawnError> {
        if names.is_empty() {
            return Err(SpawnError::NoTask);
        }

        let mut selection = Vec::with_capacity(names.len());
        self.ctx.display.reset_name_len();
        for name in names {
            let proc = self
                .ctx
                .stored
                .find(name)
                .ok_or_else(|| SpawnError::UnknownProc(name.clone()))?;
            self.ctx.display.note_name_len(proc.name().len());
            selection.push(proc);
        }
        self.ctx.shared.set_all(selection);
        Ok(())
    }

    /// Start the current selection and run the central loop until a
    /// signal, a fatal error, or (with exit-on-stop) all procs finish.
    pub async fn run(
        mut self,
        mut sig_rx: mpsc::Receiver<StopSignal>,
    ) -> Result<(), RuntimeError> {
        let exit_on_error = self.ctx.flags.exit_on_error;
        let exit_on_stop = self.ctx.flags.exit_on_stop;
        let interval = self.ctx.flags.interval;

        let tracker = TaskTracker::new();
        for proc in self.ctx.shared.all() {
            self.ctx.start_proc(&proc, Some(&tracker));
            if interval > 0 {
                tokio::time::sleep(Duration::from_secs(interval)).await;
            }
        }
        tracker.close();

        loop {
            tokio::select! {
                Some(msg) = self.control_rx.recv() => {
                    self.ctx.handle_control(msg).await;
                }
                Some(err) = self.err_rx.recv() => {
                    if exit_on_error {
                        self.ctx.stop_all(StopSignal::Interrupt).await?;
                        return Err(err);
                    }
                    tracing::error!(error = %err, "proc failed");
                }
                () = tracker.wait(), if exit_on_stop => {
                    return self.ctx.stop_all(StopSignal::Interrupt).await;
                }
                Some(sig) = sig_rx.recv() => {
                    return self.ctx.stop_all(sig).await;
                }
            }
        }
    }
}

impl Ctx {
    /// Service one mailbox message; errors go to the caller's reply.
    async fn handle_control(self: &Arc<Self>, msg: Control) {
        match msg {
            Control::Start { names, reply } => {
                let mut result = Ok(());
                for name in &names {
                    if let Err(err) = self.start_by_name(name) {
                        result = Err(err.into());
                        break;
                    }
                }
                let _ = reply.send(result);
            }
            Control::Stop { names, reply } => {
                let mut result = Ok(());
                for name in &names {
                    if let Err(err) = self.stop_proc(name, None).await {
                        result = Err(err);
                        break;
                    }
                }
                let _ = reply.send(result);
            }
            Control::StopAll { reply } => {
                let mut result = Ok(());
                for proc in self.shared.all() {
                    if let Err(err) = self.stop_proc(proc.name(), None).await {
                        result = Err(err);
                        break;
                    }
                }
                let _ = reply.send(result);
            }
            Control::Restart { names, reply } => {
                let mut result = Ok(());
                for name in &names {
                    if let Err(err) = self.restart_proc(name).await {
                        result = Err(err);
                        break;
                    }
                }
                let _ = reply.send(result);
            }
            Control::RestartAll { reply } => {
                let mut result = Ok(());
                for proc in self.shared.all() {
                    if let Err(err) = self.restart_proc(proc.name()).await {
                        result = Err(err);
                        break;
                    }
                }
                let _ = reply.send(result);
            }
        }
    }

    fn start_by_name(self: &Arc<Self>, name: &str) -> Result<(), SpawnError> {
        let proc =
            self.shared.find(name).ok_or_else(|| SpawnError::UnknownProc(name.to_string()))?;
        self.start_proc(&proc, None);
        Ok(())
    }

    /// Launch a spawn worker for the proc; a no-op while one is active.
    pub(crate) fn start_proc(self: &Arc<Self>, proc: &Arc<ProcInfo>, tracker: Option<&TaskTracker>) {
        {
            let mut st = proc.state();
            if st.child_pid.is_some() || st.worker_active {
                return;
            }
            st.worker_active = true;
            st.stopped_by_supervisor = false;
        }

        let ctx = Arc::clone(self);
        let proc = Arc::clone(proc);
        let worker = async move {
            ctx.spawn_proc(&proc).await;
            proc.state().worker_active = false;
            // Wake anything waiting on the record, spawn failures included.
            proc.notify_exit();
        };
        match tracker {
            Some(tracker) => {
                tracker.spawn(worker);
            }
            None => {
                tokio::spawn(worker);
            }
        }
    }

    /// The spawn/wait/restart cycle for one proc.
    async fn spawn_proc(self: &Arc<Self>, proc: &Arc<ProcInfo>) {
        let spec = &proc.spec;
        let logger =
            Logger::new(&spec.name, spec.color_index, Arc::clone(&self.display), self.sink.clone());

        // A built-in first token short-circuits process spawning.
        if let Some(first) = spec.cmdline.first() {
            if self.builtins.matches(first) {
                if let Some(result) = self.builtins.run(&logger, first, &self.flags).await {
                    self.drive_steps(&logger, &spec.steps).await;
                    if let Err(err) = result {
                        self.report(err.into());
                    }
                }
                return;
            }
        }

        loop {
            let mut cmd = self.build_command(proc);
            let output = self.wire_output(&mut cmd, proc, &logger).await;

            if spec.set_port {
                cmd.env("PORT", spec.port.to_string());
                logger.info(format!("Starting {} on port {}", spec.name, spec.port)).await;
            }
            for (key, values) in &spec.env {
                let joined = values.join(platform::LIST_SEPARATOR);
                logger.debug(format!("added envar: {key}={joined}")).await;
                cmd.env(key, joined);
            }
            logger.debug(format!("cmd: {}", spec.cmdline.join(" "))).await;

            let mut child = match cmd.spawn() {
                Ok(child) => child,
                Err(source) => {
                    logger.info(format!("Failed to start {}: {source}", spec.name)).await;
                    self.report(
                        SpawnError::Start { name: spec.name.clone(), source }.into(),
                    );
                    return;
                }
            };
            output.attach(&mut child, &logger);

            proc.state().child_pid = child.id();

            let wait_err: Option<String> = if spec.fork {
                // Fire and forget: the OS owns the detached child now.
                drop(child);
                None
            } else {
                match child.wait().await {
                    Ok(status) if status.success() => None,
                    Ok(status) => Some(status.to_string()),
                    Err(err) => Some(err.to_string()),
                }
            };

            let should_report = {
                let mut st = proc.state();
                let report = wait_err.is_some() && !st.stopped_by_supervisor;
                st.wait_err = wait_err.clone();
                st.child_pid = None;
                report
            };
            proc.notify_exit();

            if should_report {
                if let Some(status) = wait_err {
                    self.report(RuntimeError::Exited { name: spec.name.clone(), status });
                }
            }

            logger.info(format!("Terminating {}", spec.name)).await;
            self.drive_steps(&logger, &spec.steps).await;

            let done = {
                let st = proc.state();
                st.stopped_by_supervisor || !spec.restart_on_error || st.wait_err.is_none()
            };
            if done {
                break;
            }
            logger.info(format!("Restarting {}", spec.name)).await;
        }
    }

    fn build_command(&self, proc: &ProcInfo) -> Command {
        let spec = &proc.spec;
        let shell = platform::SHELL;
        let mut cmd = Command::new(shell[0]);
        cmd.args(&shell[1..]).arg(spec.cmdline.join(" "));

        if !spec.dir.is_empty() {
            cmd.current_dir(&spec.dir);
        }
        if spec.inherit_stdin {
            cmd.stdin(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null());
        }
        platform::configure_command(&mut cmd, spec.fork);
        cmd
    }

    /// Wire the child's stdout/stderr: discarded, piped into the logger,
    /// or bound to a pty slave with a reader streaming the master.
    async fn wire_output(&self, cmd: &mut Command, proc: &ProcInfo, logger: &Logger) -> Output {
        let spec = &proc.spec;
        if spec.fork || spec.silent {
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());
            return Output::Discard;
        }

        #[cfg(unix)]
        if self.flags.pty {
            match open_pty_stdio(cmd) {
                Ok(master) => return Output::Pty(master),
                Err(source) => {
                    logger
                        .info(format!("Failed to open pty for {}: {source}", spec.name))
                        .await;
                    self.report(
                        SpawnError::Start { name: spec.name.clone(), source }.into(),
                    );
                }
            }
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        Output::Piped
    }

    /// Drive each step to completion, sequentially.
    ///
    /// A step naming a built-in runs in-process. Anything else restores
    /// the shared sequence from the stored registry, starts the step's
    /// worker, and waits for that worker to finish.
    async fn drive_steps(self: &Arc<Self>, logger: &Logger, names: &[String]) {
        for name in names {
            if self.builtins.matches(name) {
                if let Some(result) = self.builtins.run(logger, name, &self.flags).await {
                    if let Err(err) = result {
                        self.report(err.into());
                    }
                }
                continue;
            }

            self.shared.copy_from(&self.stored);
            let Some(step) = self.shared.find(name) else {
                self.report(SpawnError::UnknownProc(name.clone()).into());
                continue;
            };

            let mut exits = step.subscribe_exits();
            self.start_proc(&step, None);
            loop {
                if !step.state().worker_active {
                    break;
                }
                if exits.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    /// Stop one proc: mark it supervisor-stopped, send the polite
    /// signal, and escalate to a kill after the grace window. Returns
    /// once the proc's worker has fully wound down.
    pub(crate) async fn stop_proc(
        &self,
        name: &str,
        sig: Option<StopSignal>,
    ) -> Result<(), RuntimeError> {
        let sig = sig.unwrap_or(StopSignal::Interrupt);
        let proc =
            self.shared.find(name).ok_or_else(|| SpawnError::UnknownProc(name.to_string()))?;

        let mut exits = proc.subscribe_exits();
        {
            let mut st = proc.state();
            if !st.worker_active && st.child_pid.is_none() {
                return Ok(());
            }
            st.stopped_by_supervisor = true;
            if let Some(pid) = st.child_pid {
                platform::terminate(pid, sig).map_err(|source| StopError::Terminate {
                    name: name.to_string(),
                    source,
                })?;
            }
        }

        let deadline = tokio::time::Instant::now() + KILL_TIMEOUT;
        let mut killed = false;
        let mut result: Result<(), RuntimeError> = Ok(());
        loop {
            {
                let st = proc.state();
                if !st.worker_active && st.child_pid.is_none() {
                    break;
                }
            }
            tokio::select! {
                changed = exits.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                () = tokio::time::sleep_until(deadline), if !killed => {
                    killed = true;
                    let pid = proc.state().child_pid;
                    if let Some(pid) = pid {
                        if let Err(source) = platform::kill(pid) {
                            result = Err(StopError::Kill {
                                name: name.to_string(),
                                source,
                            }
                            .into());
                        }
                    }
                }
            }
        }
        result
    }

    /// Stop every proc in the shared sequence, reversed when configured,
    /// pacing by the interval. The last error wins.
    pub(crate) async fn stop_all(&self, sig: StopSignal) -> Result<(), RuntimeError> {
        if self.flags.reverse_on_stop {
            let mut procs = self.shared.all();
            procs.reverse();
            self.shared.set_all(procs);
        }

        let mut last: Result<(), RuntimeError> = Ok(());
        for proc in self.shared.all() {
            if let Err(err) = self.stop_proc(proc.name(), Some(sig)).await {
                last = Err(err);
            }
            if self.flags.interval > 0 {
                tokio::time::sleep(Duration::from_secs(self.flags.interval)).await;
            }
        }
        last
    }

    async fn restart_proc(self: &Arc<Self>, name: &str) -> Result<(), RuntimeError> {
        self.stop_proc(name, None).await?;
        self.start_by_name(name)?;
        Ok(())
    }

    /// Push onto the error channel; dropped when one is already pending.
    fn report(&self, err: RuntimeError) {
        let _ = self.err_tx.try_send(err);
    }
}

/// How a child's output is routed after spawn.
enum Output {
    Discard,
    Piped,
    #[cfg(unix)]
    Pty(std::fs::File),
}

impl Output {
    /// Connect readers for the chosen routing to the spawned child.
    fn attach(self, child: &mut tokio::process::Child, logger: &Logger) {
        match self {
            Output::Discard => {}
            Output::Piped => {
                if let Some(stdout) = child.stdout.take() {
                    tokio::spawn(copy_into_logger(stdout, logger.clone()));
                }
                if let Some(stderr) = child.stderr.take() {
                    tokio::spawn(copy_into_logger(stderr, logger.clone()));
                }
            }
            #[cfg(unix)]
            Output::Pty(master) => {
                let logger = logger.clone();
                tokio::task::spawn_blocking(move || pty_reader(master, logger));
            }
        }
    }
}

async fn copy_into_logger<R>(mut reader: R, logger: Logger)
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut buf = vec![0u8; 8192];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => logger.write(buf[..n].to_vec()).await,
        }
    }
}

/// Bind the child's stdout/stderr to a fresh pty slave; returns the
/// master end for the reader task.
#[cfg(unix)]
fn open_pty_stdio(cmd: &mut Command) -> std::io::Result<std::fs::File> {
    let pty = platform::open_pty()?;
    let slave_err = pty.slave.try_clone()?;
    cmd.stdout(Stdio::from(pty.slave));
    cmd.stderr(Stdio::from(slave_err));
    Ok(std::fs::File::from(pty.master))
}

/// Blocking copy of the pty master into the proc's logger.
#[cfg(unix)]
fn pty_reader(mut master: std::fs::File, logger: Logger) {
    use std::io::Read;

    let mut buf = vec![0u8; 8192];
    loop {
        match master.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => logger.blocking_write(buf[..n].to_vec()),
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
