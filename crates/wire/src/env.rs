// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-driven RPC endpoint defaults.

/// Full dial string for a control client.
///
/// `GPM_RPC_SERVER` overrides everything; otherwise the loopback address
/// with the given port (or the default port when zero).
pub fn default_server(port: u16) -> String {
    if let Ok(server) = std::env::var("GPM_RPC_SERVER") {
        return server;
    }
    let port = if port == 0 { default_port() } else { port };
    format!("127.0.0.1:{port}")
}

/// Bind address for the server, `GPM_RPC_ADDR` or all interfaces.
pub fn default_addr() -> String {
    std::env::var("GPM_RPC_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string())
}

/// Default RPC port, `GPM_RPC_PORT` or 8555.
pub fn default_port() -> u16 {
    std::env::var("GPM_RPC_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8555)
}
