// src/tests/cursor_tests.rs

#![allow(non_snake_case)]

use crate::common::NavError;
use crate::data::cursor::{Log, LogCursor};

use ::test_case::test_case;

fn log10() -> Log {
    Log::new("/var/log/fixture.log".to_owned(), 10)
}

#[test_case(0, true, false; "at start")]
#[test_case(5, false, false; "mid log")]
#[test_case(10, false, true; "at end")]
fn test_LogCursor_sentinels(
    offset: u64,
    sof: bool,
    eof: bool,
) {
    let cursor = LogCursor::at(offset, &log10());
    assert_eq!(cursor.offset(), offset);
    assert_eq!(cursor.is_sof(), sof, "is_sof at {}", offset);
    assert_eq!(cursor.is_eof(), eof, "is_eof at {}", offset);
}

#[test]
fn test_LogCursor_empty_log_is_both_SOF_and_EOF() {
    let log = Log::new("/var/log/empty.log".to_owned(), 0);
    let cursor = LogCursor::at(0, &log);
    assert!(cursor.is_sof());
    assert!(cursor.is_eof());
}

#[test]
fn test_LogCursor_at_clamps_to_size() {
    let cursor = LogCursor::at(99, &log10());
    assert_eq!(cursor.offset(), 10);
    assert!(cursor.is_eof());
}

#[test]
fn test_LogCursor_total_order() {
    let log = log10();
    assert!(LogCursor::at(3, &log) < LogCursor::at(7, &log));
    assert_eq!(LogCursor::at(7, &log), LogCursor::at(7, &log));
}

#[test]
fn test_mark_roundtrip() {
    let log = log10();
    let cursor = LogCursor::at(5, &log);
    let mark = cursor.to_mark(&log);
    let back = LogCursor::from_mark(&mark, &log).unwrap();
    assert_eq!(back, cursor);
}

#[test]
fn test_mark_is_stable_wire_format() {
    // a token written by a previous process of this crate keeps resolving
    let log = log10();
    let mark = r#"{"l":"/var/log/fixture.log","o":7}"#;
    let cursor = LogCursor::from_mark(mark, &log).unwrap();
    assert_eq!(cursor.offset(), 7);
}

#[test_case(""; "empty token")]
#[test_case("garbage"; "not JSON")]
#[test_case(r#"{"o":3}"#; "missing log binding")]
#[test_case(r#"{"l":"/var/log/other.log","o":3}"#; "foreign log")]
#[test_case(r#"{"l":"/var/log/fixture.log","o":11}"#; "offset beyond size")]
fn test_mark_rejected(mark: &str) {
    let log = log10();
    match LogCursor::from_mark(mark, &log) {
        Err(NavError::InvalidCursor { .. }) => {}
        other => panic!("expected InvalidCursor, got {:?}", other),
    }
}

#[test]
fn test_mark_survives_log_growth() {
    // a mark taken before an append resolves against the grown snapshot
    let log_before = Log::new("/var/log/fixture.log".to_owned(), 10);
    let mark = LogCursor::at(10, &log_before).to_mark(&log_before);
    let log_after = Log::new("/var/log/fixture.log".to_owned(), 25);
    let cursor = LogCursor::from_mark(&mark, &log_after).unwrap();
    assert_eq!(cursor.offset(), 10);
    // what was EOF is now mid-log
    assert!(!cursor.is_eof());
}
