// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for registry construction

use gpm_core::{Flags, Task, Taskfile};

use super::*;

fn taskfile(tasks: Vec<Task>) -> Taskfile {
    Taskfile { tasks, ..Default::default() }
}

fn task(name: &str) -> Task {
    Task { name: name.to_string(), cmd: vec!["true".to_string()], ..Default::default() }
}

#[test]
fn empty_after_filtering_is_an_error() {
    let mut flags = Flags::default();
    let tf = taskfile(vec![Task {
        platforms: vec!["plan9".to_string()],
        ..task("never")
    }]);
    assert!(matches!(build_registry(&tf, &mut flags), Err(ConfigError::NoTasks)));
}

#[test]
fn ports_advance_in_steps_of_100() {
    let mut flags = Flags { base_port: 5000, set_ports: true, ..Default::default() };
    let tf = taskfile(vec![task("a"), task("b"), task("c")]);

    let procs = build_registry(&tf, &mut flags).unwrap();
    let ports: Vec<u16> = procs.iter().map(|p| p.spec.port).collect();
    assert_eq!(ports, vec![5000, 5100, 5200]);
    assert_eq!(flags.base_port, 5300);
    assert!(procs.iter().all(|p| p.spec.set_port));
}

#[test]
fn set_ports_off_leaves_ports_unset() {
    let mut flags = Flags { set_ports: false, ..Default::default() };
    let procs = build_registry(&taskfile(vec![task("a")]), &mut flags).unwrap();
    assert!(!procs[0].spec.set_port);
    assert_eq!(procs[0].spec.port, 0);
}

#[test]
fn color_index_wraps_over_palette() {
    let mut flags = Flags::default();
    let tasks: Vec<Task> = (0..8).map(|i| task(&format!("t{i}"))).collect();
    let procs = build_registry(&taskfile(tasks), &mut flags).unwrap();

    let indices: Vec<usize> = procs.iter().map(|p| p.spec.color_index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 0, 1]);
}

#[test]
fn names_are_trimmed_and_env_copied() {
    let mut flags = Flags::default();
    let mut tf = taskfile(vec![Task { name: "  web  ".to_string(), ..task("web") }]);
    tf.env.insert("KEY".to_string(), vec!["v1".to_string(), "v2".to_string()]);

    let procs = build_registry(&tf, &mut flags).unwrap();
    assert_eq!(procs[0].name(), "web");
    assert_eq!(procs[0].spec.env["KEY"], vec!["v1", "v2"]);
}

#[yare::parameterized(
    empty_matches = { &[], true },
    other_os_only = { &["plan9"], false },
)]
fn platform_filter(platforms: &[&str], expected: bool) {
    let platforms: Vec<String> = platforms.iter().map(|s| s.to_string()).collect();
    assert_eq!(platform_matches(&platforms), expected);
}

#[test]
fn platform_filter_accepts_current_os() {
    assert!(platform_matches(&[std::env::consts::OS.to_string()]));
}
