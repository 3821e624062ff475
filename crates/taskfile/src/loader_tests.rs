// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for taskfile loading and include folding

use tempfile::TempDir;

use super::*;

fn write(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

#[test]
fn load_missing_file_errors() {
    let err = load("/nonexistent/Taskfile.toml", false).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
}

#[test]
fn load_unparseable_file_errors() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "Taskfile.toml", "tasks = [[ not toml");
    let err = load(&path, false).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn load_single_document() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "Taskfile.toml",
        r#"
[[tasks]]
name = "web"
cmd = ["echo", "hi"]
"#,
    );

    let tf = load(&path, false).unwrap();
    assert_eq!(tf.tasks.len(), 1);
    assert_eq!(tf.tasks[0].name, "web");
}

#[test]
fn include_chain_redefinition_keeps_first_position() {
    let dir = TempDir::new().unwrap();
    let c = write(
        &dir,
        "c.toml",
        r#"
[[tasks]]
name = "t1"
cmd = ["from-c"]
"#,
    );
    let b = write(
        &dir,
        "b.toml",
        &format!(
            r#"
includes = ["{c}"]

[[tasks]]
name = "t3"
cmd = ["from-b"]
"#
        ),
    );
    let a = write(
        &dir,
        "a.toml",
        &format!(
            r#"
includes = ["{b}"]

[[tasks]]
name = "t1"
cmd = ["from-a"]

[[tasks]]
name = "t2"
cmd = ["from-a"]
"#
        ),
    );

    let tf = load(&a, false).unwrap();
    let names: Vec<&str> = tf.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["t1", "t2", "t3"]);
    // C's redefinition wins but stays at A's position
    assert_eq!(tf.tasks[0].cmd, vec!["from-c"]);
}

#[test]
fn include_loaded_once_despite_duplicates() {
    let dir = TempDir::new().unwrap();
    let shared = write(
        &dir,
        "shared.toml",
        r#"
[[artifacts.prune]]
name = "cache"
"#,
    );
    let a = write(
        &dir,
        "a.toml",
        &format!(
            r#"
includes = ["{shared}", "{shared}"]

[[tasks]]
name = "t"
cmd = ["x"]
"#
        ),
    );

    let tf = load(&a, false).unwrap();
    assert_eq!(tf.artifacts.prune.len(), 1);
}

#[test]
fn missing_include_errors() {
    let dir = TempDir::new().unwrap();
    let a = write(
        &dir,
        "a.toml",
        r#"
includes = ["/nonexistent/include.toml"]
"#,
    );
    let err = load(&a, false).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
}
