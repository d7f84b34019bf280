// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the event reader
//!
//! Feeds arbitrary bytes through `EventReader` line by line.

#![no_main]

use libfuzzer_sys::fuzz_target;

use test2html_core::EventReader;

fuzz_target!(|data: &[u8]| {
    // Reader should never panic, even on invalid UTF-8
    for event in EventReader::new(data) {
        if event.is_err() {
            break;
        }
    }
});
