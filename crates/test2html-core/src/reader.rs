// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `go test -json` stream reading
//!
//! The input is newline-delimited JSON, one [`Event`] per line. Blank lines are
//! skipped, and the `?  <pkg>  [no test files]` output line is dropped before
//! it reaches the aggregator. The first line that fails to decode stops the
//! read; that includes lines that are not valid UTF-8.
//!
//! # Example
//!
//! ```
//! use test2html_core::reader::{parse_events, EventReader};
//!
//! let input = "{\"Action\":\"run\",\"Package\":\"p\",\"Test\":\"TestA\"}\n\n";
//! let events = parse_events(input).unwrap();
//! assert_eq!(events.len(), 1);
//!
//! // Or one line at a time
//! for event in EventReader::new(input.as_bytes()) {
//!     let event = event.unwrap();
//!     assert_eq!(event.package, "p");
//! }
//! ```

use std::io::BufRead;

use tracing::trace;

use crate::error::CoreError;
use crate::event::Event;

/// Streaming reader yielding one [`Event`] per input line
pub struct EventReader<R> {
    source: R,
    buf: Vec<u8>,
    line_number: usize,
    dropped: usize,
    failed: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Wrap a buffered source
    #[must_use]
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: Vec::new(),
            line_number: 0,
            dropped: 0,
            failed: false,
        }
    }

    /// Lines consumed so far, blank and dropped lines included
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of `[no test files]` output lines dropped so far
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.buf.clear();
            match self.source.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(CoreError::Io(e)));
                }
            }
            self.line_number += 1;

            let line = self.buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let event: Event = match serde_json::from_slice(line) {
                Ok(event) => event,
                Err(source) => {
                    self.failed = true;
                    return Some(Err(CoreError::Decode {
                        line: self.line_number,
                        source,
                    }));
                }
            };

            if event.is_no_test_files_output() {
                trace!(package = %event.package, "Dropping no-test-files line");
                self.dropped += 1;
                continue;
            }

            return Some(Ok(event));
        }
    }
}

/// Read every event from a buffered source
///
/// # Errors
///
/// Returns `CoreError::Io` if the source cannot be read and
/// `CoreError::Decode` for the first line that is not a valid event.
pub fn read_events<R: BufRead>(source: R) -> Result<Vec<Event>, CoreError> {
    EventReader::new(source).collect()
}

/// Parse events from an in-memory string
///
/// # Errors
///
/// Returns `CoreError::Decode` for the first line that is not a valid event.
pub fn parse_events(input: &str) -> Result<Vec<Event>, CoreError> {
    read_events(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use similar_asserts::assert_eq;

    #[test]
    fn test_parse_events_skips_blank_lines() {
        let input = r#"
{"Action":"run","Package":"p","Test":"TestA"}

   {"Action":"pass","Package":"p","Test":"TestA","Elapsed":0.5}
"#;
        let events = parse_events(input).expect("Should parse");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, Action::Run);
        assert_eq!(events[1].action, Action::Pass);
        assert_eq!(events[1].elapsed, Some(0.5));
    }

    #[test]
    fn test_no_test_files_line_dropped() {
        let input = r#"{"Action":"output","Package":"example.com/empty","Output":"?   \texample.com/empty\t[no test files]\n"}
{"Action":"output","Package":"example.com/empty","Output":"?\texample.com/empty\t[no test files]\n"}
{"Action":"skip","Package":"example.com/empty","Elapsed":0}"#;

        let mut reader = EventReader::new(input.as_bytes());
        let events: Vec<_> = reader
            .by_ref()
            .collect::<Result<_, _>>()
            .expect("Should parse");

        // Only the exact pattern is dropped
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, Action::Output);
        assert_eq!(events[1].action, Action::Skip);
        assert_eq!(reader.dropped(), 1);
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let input = "{\"Action\":\"run\",\"Package\":\"p\"}\n\nnot json\n{\"Action\":\"run\"}";
        let err = parse_events(input).expect_err("Should fail");
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let input = "garbage\n{\"Action\":\"run\",\"Package\":\"p\"}\n";
        let mut reader = EventReader::new(input.as_bytes());
        assert!(matches!(reader.next(), Some(Err(CoreError::Decode { line: 1, .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_events("").expect("Should parse").is_empty());
        assert!(parse_events("\n\n  \n").expect("Should parse").is_empty());
    }

    #[test]
    fn test_non_object_line_is_rejected() {
        assert!(parse_events("[1,2,3]").is_err());
        assert!(parse_events("42").is_err());
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let mut input = b"{\"Action\":\"run\",\"Package\":\"p\",\"Test\":\"TestA\"}\n".to_vec();
        input.extend_from_slice(b"{\"Action\":\"output\",\"Package\":\"p\",\"Output\":\"bad \xff byte\"}\n");

        let err = read_events(input.as_slice()).expect_err("Should fail");
        assert!(matches!(err, CoreError::Decode { line: 2, .. }));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "{\"Action\":\"run\",\"Package\":\"p\"}\r\n\r\n{\"Action\":\"pass\",\"Package\":\"p\"}\r\n";
        let mut reader = EventReader::new(input.as_bytes());
        let events: Vec<_> = reader
            .by_ref()
            .collect::<Result<_, _>>()
            .expect("Should parse");
        assert_eq!(events.len(), 2);
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn test_io_error_is_reported() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }

        let err = read_events(std::io::BufReader::new(Broken)).expect_err("Should fail");
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(err.line(), None);
    }
}
