// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC protocol for supervisor control.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod env;
mod request;
mod response;
mod wire;

pub use client::call;
pub use env::{default_addr, default_port, default_server};
pub use request::Request;
pub use response::{ProcStatus, Response};
pub use wire::{decode, encode, read_frame, read_message, write_frame, write_message, ProtocolError};

#[cfg(test)]
mod property_tests;

#[cfg(test)]
#[path = "wire_tests.rs"]
mod wire_roundtrip_tests;
