// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `run` command: dial the RPC server and invoke one method.

use anyhow::{anyhow, bail, Context, Result};
use gpm_wire::{Request, Response};

pub async fn invoke(command: &str, args: Vec<String>, port: u16) -> Result<()> {
    let request =
        Request::from_command(command, args).ok_or_else(|| anyhow!("unknown command"))?;

    let server = gpm_wire::default_server(port);
    let response =
        gpm_wire::call(&server, &request).await.with_context(|| format!("dial {server}"))?;

    match response {
        Response::Ok => Ok(()),
        Response::Error { message } => bail!(message),
        Response::List { names } => {
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Response::Status { procs } => {
            for proc in procs {
                println!("{}", proc.render());
            }
            Ok(())
        }
    }
}
