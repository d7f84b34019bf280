// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! test2html-core: Go test event aggregation for go-test2html
//!
//! This library crate reads the newline-delimited JSON emitted by
//! `go test -json` and folds it into a [`Report`]: packages, tests, and
//! subtests with pass/fail/skip rollups and durations, ready for rendering.
//!
//! # Example
//!
//! ```no_run
//! use test2html_core::{Aggregator, read_events};
//!
//! let stdin = std::io::stdin();
//! let events = read_events(stdin.lock()).unwrap();
//! let report = Aggregator::new("Go Test Report").aggregate(&events);
//! println!("{} passed, {} failed", report.summary().passed, report.summary().failed);
//! ```

pub mod aggregate;
pub mod error;
pub mod event;
pub mod naming;
pub mod reader;
pub mod report;

pub use aggregate::{Aggregator, aggregate};
pub use error::CoreError;
pub use event::{Action, Event};
pub use reader::{EventReader, parse_events, read_events};
pub use report::{PackageNode, Report, Summary, TestId, TestNode, TestStatus, format_duration};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregate::Aggregator;
    pub use crate::error::CoreError;
    pub use crate::event::{Action, Event};
    pub use crate::reader::read_events;
    pub use crate::report::{Report, Summary, TestStatus};
}
