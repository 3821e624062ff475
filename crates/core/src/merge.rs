// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed sequence merge helpers used by taskfile includes.
//!
//! Both helpers preserve the base sequence's relative order: existing
//! items keep their position, new items append in the order they arrive.

use std::collections::HashMap;
use std::hash::Hash;

/// Append items from `add` whose key is not already present in `base`.
pub fn append_new_by_key<T, K, F>(mut base: Vec<T>, add: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: std::collections::HashSet<K> = base.iter().map(&key).collect();
    for item in add {
        let k = key(&item);
        if seen.contains(&k) {
            continue;
        }
        seen.insert(k);
        base.push(item);
    }
    base
}

/// Append items from `add`, overwriting any existing item with the same
/// key in place. Overwritten items keep their original position.
pub fn append_overwrite_by_key<T, K, F>(mut base: Vec<T>, add: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> =
        base.iter().enumerate().map(|(i, item)| (key(item), i)).collect();
    for item in add {
        match index.get(&key(&item)) {
            Some(&i) => base[i] = item,
            None => {
                index.insert(key(&item), base.len());
                base.push(item);
            }
        }
    }
    base
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
