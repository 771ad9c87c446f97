// src/tests/scanner_tests.rs

#![allow(non_snake_case)]

use crate::common::NavError;
use crate::data::cursor::LogCursor;
use crate::readers::navigator::{LogNavigator, SearchResult};
use crate::readers::rawaccess::{LineLogAccess, LogRawAccess};
use crate::readers::scanner::{
    ReaderStrategy, RegexScanner, ScanDecision, StopReason, TimeoutReaderStrategy,
};
use crate::readers::textreader::TextLogReader;
use crate::tests::common::{ntf_fpath, open_log, NTF_100X10, NTF_BAD_UTF8, NTF_SEV};

use std::time::Duration;

// NTF_SEV entry layout: the ERROR line is the fourth of five entries

fn entry_start(
    access: &LineLogAccess,
    index: usize,
) -> u64 {
    access
        .relative(None, index as i64)
        .unwrap()
        .offset()
}

fn mark_at(
    access: &LineLogAccess,
    offset: u64,
) -> String {
    access.to_mark(&LogCursor::at(offset, access.log()))
}

#[test]
fn test_search_forward_finds_match_and_materializes_page() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("ERROR").unwrap();
    let result: SearchResult = navigator
        .search(&scanner, None, 5)
        .unwrap();
    let error_start = entry_start(&access, 3);
    let event = result
        .event
        .expect("expected a match");
    assert_eq!(
        event
            .pointer()
            .offset(),
        error_start
    );
    assert_eq!(event.entries().len(), 1);
    assert!(event.entries()[0]
        .raw()
        .unwrap()
        .contains("ERROR"));
    // the page starts at the match
    let entries = result
        .entries
        .expect("expected a page");
    assert!(entries.entries()[0]
        .raw()
        .unwrap()
        .contains("ERROR"));
    assert_eq!(result.last_mark, mark_at(&access, error_start));
    assert_eq!(result.scanned_size, error_start);
    assert!(!result.sof_reached);
}

#[test]
fn test_search_zero_deadline_resumes_at_reader_stop_point() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("NOMATCH").unwrap();
    let result = navigator
        .search_with_timeout(&scanner, None, 5, Duration::ZERO)
        .unwrap();
    assert!(result
        .event
        .is_none());
    assert!(result
        .entries
        .is_none());
    // the resume mark is where the reader actually stopped — one entry in —
    // not the original search cursor
    let first_end = entry_start(&access, 1);
    assert_eq!(result.last_mark, mark_at(&access, first_end));
    assert_eq!(result.scanned_size, first_end);
    assert!(!result.sof_reached);
}

#[test]
fn test_search_multi_round_resume_reaches_match() {
    // with a zero budget each round consumes one entry; resuming with the
    // returned mark walks the log without re-scanning
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("ERROR").unwrap();
    let mut mark: Option<String> = None;
    let mut rounds = 0;
    let event = loop {
        rounds += 1;
        assert!(rounds <= 10, "search did not converge");
        let result = navigator
            .search_with_timeout(&scanner, mark.as_deref(), 1, Duration::ZERO)
            .unwrap();
        if let Some(event) = result.event {
            break event;
        }
        mark = Some(result.last_mark);
    };
    assert_eq!(rounds, 4);
    assert_eq!(
        event
            .pointer()
            .offset(),
        entry_start(&access, 3)
    );
}

#[test]
fn test_search_backward_runs_off_the_start() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("NOMATCH").unwrap();
    let error_start = entry_start(&access, 3);
    let mark = mark_at(&access, error_start);
    let result = navigator
        .search(&scanner, Some(&mark), -5)
        .unwrap();
    assert!(result
        .event
        .is_none());
    assert!(result.sof_reached);
    // resume mark at start-of-log, scanned distance the full way back
    assert_eq!(result.last_mark, mark_at(&access, 0));
    assert_eq!(result.scanned_size, error_start);
}

#[test]
fn test_search_backward_finds_most_recent_match_first() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("INFO").unwrap();
    let result = navigator
        .search(&scanner, None, -2)
        .unwrap();
    let info_start = entry_start(&access, 1);
    let event = result
        .event
        .expect("expected a match");
    assert_eq!(
        event
            .pointer()
            .offset(),
        info_start
    );
    // the page is read forward from the match even for a backward search
    let entries = result
        .entries
        .expect("expected a page");
    assert_eq!(entries.entries().len(), 2);
    assert!(entries.entries()[0]
        .raw()
        .unwrap()
        .starts_with("INFO"));
    assert!(!result.sof_reached);
}

#[test]
fn test_search_count_zero_returns_event_with_empty_page() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("ERROR").unwrap();
    let result = navigator
        .search(&scanner, None, 0)
        .unwrap();
    assert!(result
        .event
        .is_some());
    let entries = result
        .entries
        .expect("expected an (empty) page");
    assert!(entries
        .entries()
        .is_empty());
}

#[test]
fn test_search_format_error_aborts() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_BAD_UTF8));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("never matches the good line").unwrap();
    match navigator.search(&scanner, None, 5) {
        Err(NavError::Format { .. }) => {}
        other => panic!("expected Format error, got {:?}", other),
    }
}

#[test]
fn test_search_invalid_mark_is_client_error() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_SEV));
    let reader = TextLogReader::new();
    let navigator = LogNavigator::new(&reader, &access);
    let scanner = RegexScanner::new("ERROR").unwrap();
    match navigator.search(&scanner, Some("{bogus"), 5) {
        Err(NavError::InvalidCursor { .. }) => {}
        other => panic!("expected InvalidCursor, got {:?}", other),
    }
}

#[test]
fn test_RegexScanner_rejects_invalid_pattern() {
    match RegexScanner::new("[unclosed") {
        Err(NavError::Pattern(_)) => {}
        other => panic!("expected Pattern error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_TimeoutReaderStrategy_decisions() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let reader = TextLogReader::new();
    let mut consumer = crate::readers::entryreader::BufferedConsumer::new(1);
    use crate::readers::entryreader::LogEntryReader;
    reader
        .read_entries(&access, None, &mut consumer)
        .unwrap();
    let entry = &consumer.buffer()[0];

    let mut generous = TimeoutReaderStrategy::new(Duration::from_secs(3600));
    assert_eq!(generous.continue_reading(entry), ScanDecision::Continue);

    let mut spent = TimeoutReaderStrategy::new(Duration::ZERO);
    assert_eq!(
        spent.continue_reading(entry),
        ScanDecision::Stop(StopReason::DeadlineElapsed)
    );
}
