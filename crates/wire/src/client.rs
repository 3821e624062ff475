// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal control client: one request, one response per connection.

use tokio::net::TcpStream;

use crate::wire::{read_frame, write_frame, ProtocolError};
use crate::{Request, Response};

/// Dial the supervisor and invoke one method.
pub async fn call(server: &str, request: &Request) -> Result<Response, ProtocolError> {
    let mut stream = TcpStream::connect(server).await?;
    write_frame(&mut stream, request).await?;
    read_frame(&mut stream).await
}
