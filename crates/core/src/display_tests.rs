// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn name_len_is_a_running_max() {
    let display = Display::new(true);
    display.note_name_len(3);
    display.note_name_len(8);
    display.note_name_len(5);
    assert_eq!(display.max_name_len(), 8);

    display.reset_name_len();
    assert_eq!(display.max_name_len(), 0);
}

#[test]
fn log_time_toggles() {
    let display = Display::new(false);
    assert!(!display.log_time());
    display.set_log_time(true);
    assert!(display.log_time());
}
