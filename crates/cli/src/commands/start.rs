// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `start` command: select, supervise, serve.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use gpm_core::{Flags, ProcManager};
use gpm_supervisor::{platform, serve, ServerCtx, Supervisor};
use tokio_util::sync::CancellationToken;

use crate::app::App;

pub async fn run(app: &App, names: &[String]) -> Result<()> {
    if names.is_empty() {
        bail!("no task specified");
    }

    app.display.set_log_time(app.flags.log_time);

    let shared = Arc::new(ProcManager::new());
    shared.copy_from(&app.stored);

    let supervisor = Supervisor::new(
        app.flags.clone(),
        shared,
        Arc::clone(&app.stored),
        Arc::clone(&app.display),
        Arc::clone(&app.builtins),
        gpm_supervisor::LogSink::stdout(),
    );
    supervisor.select(names)?;

    load_envfiles(&app.flags)?;

    let cancel = CancellationToken::new();
    let server = if app.flags.start_rpc_server {
        let ctx = ServerCtx { control: supervisor.control_handle(), procs: supervisor.shared() };
        let addr = gpm_wire::default_addr();
        let port = app.flags.port;
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(err) = serve(&addr, port, ctx, cancel).await {
                tracing::error!(error = %err, "failed to start RPC server");
            }
        }))
    } else {
        None
    };

    let sig_rx = platform::signal_channel().context("install signal handlers")?;
    let result = supervisor.run(sig_rx).await;

    // Unblock accept and give in-flight handlers their drain window.
    cancel.cancel();
    if let Some(server) = server {
        let _ = server.await;
    }

    result.map_err(Into::into)
}

/// Load the configured dotenv files that exist.
fn load_envfiles(flags: &Flags) -> Result<()> {
    for file in flags.envfiles() {
        if !Path::new(&file).exists() {
            continue;
        }
        let loaded = if flags.env_overload {
            dotenvy::from_path_override(&file)
        } else {
            dotenvy::from_path(&file)
        };
        loaded.with_context(|| format!("failed to load env file {file}"))?;
    }
    Ok(())
}
