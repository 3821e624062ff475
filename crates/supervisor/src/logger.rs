// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-proc line multiplexer.
//!
//! Each proc owns a [`Logger`] bound to its palette color and name. Child
//! output is buffered until a newline; a buffered tail is flushed after a
//! short grace period so partial lines still appear. One line goes out at
//! a time under the sink's lock, so lines from different procs never
//! interleave mid-line.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use gpm_core::{Display, COLORS};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a partial line may sit buffered before it is flushed anyway.
const LINE_GRACE: Duration = Duration::from_millis(2);

/// The shared output sink; the lock serializes exactly one line.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl LogSink {
    pub fn stdout() -> Self {
        Self { inner: Arc::new(Mutex::new(Box::new(std::io::stdout()))) }
    }

    /// In-memory sink for tests; the returned buffer observes all writes.
    pub fn memory() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = SharedVec(Arc::clone(&buffer));
        (Self { inner: Arc::new(Mutex::new(Box::new(writer))) }, buffer)
    }
}

struct SharedVec(Arc<Mutex<Vec<u8>>>);

impl Write for SharedVec {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Handle for writing one proc's output through the multiplexer.
#[derive(Clone)]
pub struct Logger {
    tx: mpsc::Sender<Vec<u8>>,
}

impl Logger {
    pub fn new(name: &str, color_index: usize, display: Arc<Display>, sink: LogSink) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let writer = LineWriter {
            name: name.to_string(),
            color: COLORS[color_index % COLORS.len()],
            display,
            sink,
            pending: Vec::new(),
        };
        tokio::spawn(writer.run(rx));
        Self { tx }
    }

    /// Queue raw child output.
    pub async fn write(&self, chunk: Vec<u8>) {
        let _ = self.tx.send(chunk).await;
    }

    /// Queue raw child output from a blocking context (pty reader).
    pub fn blocking_write(&self, chunk: Vec<u8>) {
        let _ = self.tx.blocking_send(chunk);
    }

    /// Write an info line through the proc's frame.
    pub async fn info(&self, message: impl AsRef<str>) {
        self.write(format!("[info] {}\n", message.as_ref()).into_bytes()).await;
    }

    /// Write a debug line; dropped unless debug diagnostics are enabled.
    pub async fn debug(&self, message: impl AsRef<str>) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            self.write(format!("[debug] {}\n", message.as_ref()).into_bytes()).await;
        }
    }
}

struct LineWriter {
    name: String,
    color: u8,
    display: Arc<Display>,
    sink: LogSink,
    pending: Vec<u8>,
}

impl LineWriter {
    async fn run(mut self, mut rx: mpsc::Receiver<Vec<u8>>) {
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                chunk = rx.recv() => match chunk {
                    Some(data) => self.consume(&data, &mut deadline),
                    None => {
                        if !self.pending.is_empty() {
                            self.emit(b"\n");
                        }
                        return;
                    }
                },
                () = sleep_until_opt(deadline), if deadline.is_some() => {
                    if !self.pending.is_empty() {
                        self.emit(b"\n");
                    }
                    deadline = None;
                }
            }
        }
    }

    /// Split a chunk into lines; buffer any trailing partial line.
    fn consume(&mut self, data: &[u8], deadline: &mut Option<Instant>) {
        let mut rest = data;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let line = &rest[..=pos];
            rest = &rest[pos + 1..];

            // A bare newline only flushes when something is buffered.
            if line == b"\n" && self.pending.is_empty() {
                continue;
            }
            self.emit(line);
            *deadline = None;
        }

        if !rest.is_empty() {
            self.pending.extend_from_slice(rest);
            *deadline = Some(Instant::now() + LINE_GRACE);
        }
    }

    /// Write one prefixed line: any buffered tail plus `line`.
    fn emit(&mut self, line: &[u8]) {
        let mut out = self.sink.inner.lock();
        let width = self.display.max_name_len();

        let _ = write!(out, "\x1b[{}m", self.color);
        if self.display.log_time() {
            let now = chrono::Local::now().format("%H:%M:%S");
            let _ = write!(out, "{} {:>width$} | ", now, self.name);
        } else {
            let _ = write!(out, "{:>width$} | ", self.name);
        }
        let _ = out.write_all(b"\x1b[m");
        let _ = out.write_all(&self.pending);
        self.pending.clear();
        let _ = out.write_all(line);
        let _ = out.flush();
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        // Guarded out by the caller's `if deadline.is_some()`.
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
