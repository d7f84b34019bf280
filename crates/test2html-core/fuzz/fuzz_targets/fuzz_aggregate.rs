// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the reader and aggregator together
//!
//! Any input that decodes must aggregate into a report whose counters add up.

#![no_main]

use libfuzzer_sys::fuzz_target;

use test2html_core::{Aggregator, parse_events};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data)
        && let Ok(events) = parse_events(input)
    {
        let report = Aggregator::new("fuzz").aggregate(&events);
        assert!(report.summary().is_consistent());
        for package in report.packages() {
            assert!(package.summary().is_consistent());
        }
    }
});
