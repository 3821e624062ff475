// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for keyed sequence merges

use super::*;

#[test]
fn append_new_skips_existing_keys() {
    let base = vec!["a", "b"];
    let add = vec!["b", "c", "a", "d"];
    let merged = append_new_by_key(base, add, |s| s.to_string());
    assert_eq!(merged, vec!["a", "b", "c", "d"]);
}

#[test]
fn append_new_dedupes_within_add() {
    let merged = append_new_by_key(vec![], vec!["x", "x", "y"], |s| s.to_string());
    assert_eq!(merged, vec!["x", "y"]);
}

#[test]
fn append_overwrite_keeps_position() {
    let base = vec![("a", 1), ("b", 2), ("c", 3)];
    let add = vec![("b", 20), ("d", 4)];
    let merged = append_overwrite_by_key(base, add, |(k, _)| k.to_string());
    assert_eq!(merged, vec![("a", 1), ("b", 20), ("c", 3), ("d", 4)]);
}

#[test]
fn append_overwrite_later_add_wins() {
    let merged =
        append_overwrite_by_key(vec![("a", 1)], vec![("a", 2), ("a", 3)], |(k, _)| k.to_string());
    assert_eq!(merged, vec![("a", 3)]);
}
