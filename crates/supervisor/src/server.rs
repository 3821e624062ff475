// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP control server.
//!
//! One acceptor task, one handler task per connection. Mutating methods
//! are forwarded through the supervisor mailbox; `List` and `Status`
//! answer from a registry snapshot. A handler panic becomes an error
//! response, never a crash.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use gpm_core::ProcManager;
use gpm_wire::{ProcStatus, Request, Response};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::control::Control;
use crate::error::ServerError;

/// Time allowed for in-flight handlers after cancellation.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// What a connection handler needs: the mailbox and the registry.
#[derive(Clone)]
pub struct ServerCtx {
    pub control: mpsc::Sender<Control>,
    pub procs: Arc<ProcManager>,
}

/// Accept and serve connections until the token is cancelled, then
/// drain outstanding handlers for up to ten seconds.
pub async fn serve(
    addr: &str,
    port: u16,
    ctx: ServerCtx,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let bind = format!("{addr}:{port}");
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|source| ServerError::Bind { addr: bind.clone(), source })?;
    tracing::debug!(addr = %bind, "RPC server listening");
    serve_listener(listener, ctx, cancel).await
}

/// [`serve`] over an already-bound listener.
pub async fn serve_listener(
    listener: TcpListener,
    ctx: ServerCtx,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let tracker = TaskTracker::new();
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "connection accepted");
                    let ctx = ctx.clone();
                    tracker.spawn(handle_connection(stream, ctx));
                }
                Err(err) => tracing::error!(error = %err, "accept error"),
            },
        }
    }

    tracker.close();
    tokio::select! {
        () = tracker.wait() => Ok(()),
        () = tokio::time::sleep(DRAIN_TIMEOUT) => Err(ServerError::ShutdownTimeout),
    }
}

/// Serve framed requests on one connection until the peer hangs up.
async fn handle_connection(mut stream: TcpStream, ctx: ServerCtx) {
    loop {
        let request: Request = match gpm_wire::read_frame(&mut stream).await {
            Ok(request) => request,
            Err(_) => return,
        };

        // A panicking handler answers with an error instead of taking
        // down the server.
        let response = match std::panic::AssertUnwindSafe(dispatch(&ctx, request))
            .catch_unwind()
            .await
        {
            Ok(response) => response,
            Err(_) => Response::Error { message: "handler panicked".to_string() },
        };

        if gpm_wire::write_frame(&mut stream, &response).await.is_err() {
            return;
        }
    }
}

async fn dispatch(ctx: &ServerCtx, request: Request) -> Response {
    match request {
        Request::List => {
            let names = ctx.procs.all().iter().map(|p| p.name().to_string()).collect();
            Response::List { names }
        }
        Request::Status => {
            let procs = ctx
                .procs
                .all()
                .iter()
                .map(|p| ProcStatus { name: p.name().to_string(), running: p.running() })
                .collect();
            Response::Status { procs }
        }
        Request::Start { names } => {
            forward(ctx, |reply| Control::Start { names, reply }).await
        }
        Request::Stop { names } => forward(ctx, |reply| Control::Stop { names, reply }).await,
        Request::StopAll => forward(ctx, |reply| Control::StopAll { reply }).await,
        Request::Restart { names } => {
            forward(ctx, |reply| Control::Restart { names, reply }).await
        }
        Request::RestartAll => forward(ctx, |reply| Control::RestartAll { reply }).await,
    }
}

/// Enqueue a mailbox message and block on its reply.
async fn forward<F>(ctx: &ServerCtx, make: F) -> Response
where
    F: FnOnce(oneshot::Sender<Result<(), crate::error::RuntimeError>>) -> Control,
{
    let (reply_tx, reply_rx) = oneshot::channel();
    if ctx.control.send(make(reply_tx)).await.is_err() {
        return Response::Error { message: "supervisor unavailable".to_string() };
    }
    match reply_rx.await {
        Ok(Ok(())) => Response::Ok,
        Ok(Err(err)) => Response::Error { message: err.to_string() },
        Err(_) => Response::Error { message: "supervisor dropped the request".to_string() },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
