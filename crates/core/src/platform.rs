// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform tag matching for tasks and downloads.

/// True when `platforms` is empty or names the current OS.
///
/// `darwin` is accepted as a synonym for `macos` so taskfiles written
/// against Go's GOOS tags keep working.
pub fn platform_matches(platforms: &[String]) -> bool {
    if platforms.is_empty() {
        return true;
    }
    platforms
        .iter()
        .any(|p| p == std::env::consts::OS || (p == "darwin" && std::env::consts::OS == "macos"))
}
