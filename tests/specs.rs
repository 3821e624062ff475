// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level CLI specs: drive the `gpm` binary end to end.

use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

const TASKFILE: &str = r#"
[[tasks]]
name = "hello"
desc = "say hello"
cmd = ["echo", "hello from gpm"]

[[tasks]]
name = "quiet"
cmd = ["true"]

[[runas]]
name = "helloctl"
tasks = ["hello"]
start = true
"#;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Taskfile.toml"), TASKFILE).unwrap();
    dir
}

fn gpm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gpm").unwrap();
    cmd.current_dir(dir.path());
    cmd.timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn check_lists_tasks_sorted() {
    let dir = project();
    let assert = gpm(&dir).arg("check").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(
        stdout.contains("Valid taskfile detected (hello: say hello, quiet)"),
        "unexpected check output: {stdout}"
    );
}

#[test]
fn version_prints_the_crate_version() {
    let dir = project();
    let assert = gpm(&dir).arg("version").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_taskfile_exits_one() {
    let dir = TempDir::new().unwrap();
    let assert = gpm(&dir).arg("check").assert().failure().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("[error]"), "error goes to stderr: {stderr}");
}

#[test]
fn empty_taskfile_exits_one() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Taskfile.toml"), "").unwrap();
    gpm(&dir).arg("check").assert().failure().code(1);
}

#[cfg(unix)]
#[test]
fn start_runs_a_task_to_completion() {
    let dir = project();
    let assert = gpm(&dir)
        .args(["--rpc-server=false", "start", "hello"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("hello from gpm"), "proc output: {stdout}");
}

#[cfg(unix)]
#[test]
fn start_unknown_task_exits_one() {
    let dir = project();
    gpm(&dir).args(["--rpc-server=false", "start", "ghost"]).assert().failure().code(1);
}

#[cfg(unix)]
#[test]
fn runas_starts_the_mapped_tasks() {
    let dir = project();
    let assert = gpm(&dir)
        .args(["--rpc-server=false", "runas", "helloctl"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("hello from gpm"), "runas output: {stdout}");
}

#[test]
fn export_upstart_writes_conf_files() {
    let dir = project();
    std::fs::write(dir.path().join(".env"), "KEY=value\n").unwrap();

    gpm(&dir).args(["export", "upstart", "out"]).assert().success();

    let conf =
        std::fs::read_to_string(dir.path().join("out").join("app-hello.conf")).unwrap();
    assert!(conf.contains("respawn"));
    assert!(conf.contains("env KEY='value'"));
    assert!(conf.contains("exec echo hello from gpm"));
}

#[test]
fn run_without_a_server_exits_one() {
    let dir = project();
    gpm(&dir)
        .env("GPM_RPC_SERVER", "127.0.0.1:1")
        .args(["run", "list"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn dotfile_overrides_flags() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Other.toml"), TASKFILE).unwrap();
    std::fs::write(dir.path().join(".gpm.toml"), "taskfile = \"Other.toml\"\n").unwrap();

    // no Taskfile.toml in the directory, so success proves the dotfile won
    gpm(&dir).arg("check").assert().success();
}
