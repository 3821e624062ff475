// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for single-artifact downloads

use std::sync::Arc;

use gpm_core::Display;
use tempfile::TempDir;

use crate::logger::LogSink;
use crate::Logger;

use super::*;

fn logger() -> (Logger, Arc<parking_lot::Mutex<Vec<u8>>>) {
    let (sink, buffer) = LogSink::memory();
    (Logger::new("pull", 0, Arc::new(Display::new(false)), sink), buffer)
}

fn sha_of(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[tokio::test]
async fn empty_url_is_rejected() {
    let fetch = Fetch {
        url: String::new(),
        dir: PathBuf::from("dl"),
        filename: "x".to_string(),
        sha256: String::new(),
    };
    let (logger, _) = logger();
    assert!(matches!(fetch.run(&logger).await, Err(BuiltinError::UrlEmpty)));
}

#[tokio::test]
async fn cached_file_with_matching_hash_skips_the_network() {
    let dir = TempDir::new().unwrap();
    let body = b"artifact body";
    std::fs::write(dir.path().join("tool.bin"), body).unwrap();

    // unroutable url: any network attempt would error, so success proves
    // the cache short-circuit
    let fetch = Fetch {
        url: "http://127.0.0.1:1/tool.bin".to_string(),
        dir: dir.path().to_path_buf(),
        filename: "tool.bin".to_string(),
        sha256: sha_of(body),
    };
    let (logger, buffer) = logger();
    fetch.run(&logger).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    let out = String::from_utf8(buffer.lock().clone()).unwrap();
    assert!(out.contains("Ok: tool.bin"), "cache hit logged: {out:?}");
    assert!(!out.contains("Downloading"), "no download attempted: {out:?}");
}

#[tokio::test]
async fn cached_file_without_expected_hash_counts_as_hit() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tool.bin"), b"whatever").unwrap();

    let fetch = Fetch {
        url: "http://127.0.0.1:1/tool.bin".to_string(),
        dir: dir.path().to_path_buf(),
        filename: "tool.bin".to_string(),
        sha256: String::new(),
    };
    let (logger, _) = logger();
    fetch.run(&logger).await.unwrap();
}

#[tokio::test]
async fn sha256_file_streams_the_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data");
    let body = vec![7u8; 3 * 1024 * 1024];
    std::fs::write(&path, &body).unwrap();

    assert_eq!(sha256_file(&path).await.unwrap(), sha_of(&body));
}

#[tokio::test]
async fn hash_case_is_insensitive_for_cache_hits() {
    let dir = TempDir::new().unwrap();
    let body = b"payload";
    std::fs::write(dir.path().join("f"), body).unwrap();

    let fetch = Fetch {
        url: "http://127.0.0.1:1/f".to_string(),
        dir: dir.path().to_path_buf(),
        filename: "f".to_string(),
        sha256: sha_of(body).to_uppercase(),
    };
    assert!(fetch.cached(&dir.path().join("f")).await.unwrap());
}
