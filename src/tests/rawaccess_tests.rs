// src/tests/rawaccess_tests.rs

#![allow(non_snake_case)]

use crate::data::cursor::LogCursor;
use crate::readers::rawaccess::LogRawAccess;
use crate::tests::common::{ntf_fpath, open_log, open_log_blocksz, NTF_100X10, NTF_EMPTY, NTF_NONL};

use ::test_case::test_case;

// NTF_100X10: 100 entries of 10 bytes each; entry N starts at (N - 1) * 10

#[test]
fn test_relative_None_0_is_SOF() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor = access
        .relative(None, 0)
        .unwrap();
    assert_eq!(cursor.offset(), 0);
    assert!(cursor.is_sof());
    assert!(!cursor.is_eof());
}

#[test_case(5, 50; "five entries from SOF")]
#[test_case(1, 10; "one entry from SOF")]
#[test_case(100, 1000; "all entries from SOF")]
#[test_case(500, 1000; "overrun clamps to EOF")]
fn test_relative_forward_from_SOF(
    delta: i64,
    offset_expect: u64,
) {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor = access
        .relative(None, delta)
        .unwrap();
    assert_eq!(cursor.offset(), offset_expect);
}

#[test_case(1000, -5, 950; "five back from EOF")]
#[test_case(1000, -100, 0; "all the way back")]
#[test_case(50, -5, 0; "exactly to SOF")]
#[test_case(30, -10, 0; "underrun clamps to SOF")]
#[test_case(55, -5, 0; "mid-entry floor then back")]
fn test_relative_backward(
    offset_from: u64,
    delta: i64,
    offset_expect: u64,
) {
    let (log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor_from = LogCursor::at(offset_from, &log);
    let cursor = access
        .relative(Some(&cursor_from), delta)
        .unwrap();
    assert_eq!(cursor.offset(), offset_expect);
}

#[test_case(0, 0; "SOF is a boundary")]
#[test_case(50, 50; "entry start is a boundary")]
#[test_case(55, 60; "mid-entry snaps forward")]
#[test_case(999, 1000; "inside final entry snaps to EOF")]
#[test_case(1000, 1000; "EOF stays EOF")]
fn test_relative_snap_to_boundary(
    offset_from: u64,
    offset_expect: u64,
) {
    let (log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor_from = LogCursor::at(offset_from, &log);
    let cursor = access
        .relative(Some(&cursor_from), 0)
        .unwrap();
    assert_eq!(cursor.offset(), offset_expect);
}

#[test]
fn test_relative_roundtrip_away_from_sentinels() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor = access
        .relative(None, 3)
        .unwrap();
    let there = access
        .relative(Some(&cursor), 4)
        .unwrap();
    let back = access
        .relative(Some(&there), -4)
        .unwrap();
    assert_eq!(back, cursor);
}

#[test]
fn test_distance_antisymmetry() {
    let (log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let a = LogCursor::at(30, &log);
    let b = LogCursor::at(70, &log);
    assert_eq!(access.distance(Some(&a), &b), 40);
    assert_eq!(access.distance(Some(&b), &a), -40);
    assert_eq!(
        access.distance(Some(&a), &b),
        -access.distance(Some(&b), &a)
    );
}

#[test]
fn test_distance_from_None_is_from_SOF() {
    let (log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let b = LogCursor::at(70, &log);
    assert_eq!(access.distance(None, &b), 70);
}

#[test]
fn test_read_at_start() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let mut buf = [0u8; 10];
    let n = access
        .read_at(0, &mut buf)
        .unwrap();
    assert_eq!(n, 10);
    assert_eq!(&buf, b"entry 001\n");
}

#[test]
fn test_read_at_crosses_blocks() {
    // blocksz 16 puts every entry across a block seam somewhere
    let (_log, access) = open_log_blocksz(&ntf_fpath(&NTF_100X10), 16);
    let mut buf = [0u8; 10];
    let n = access
        .read_at(10, &mut buf)
        .unwrap();
    assert_eq!(n, 10);
    assert_eq!(&buf, b"entry 002\n");
}

#[test]
fn test_read_at_clamps_at_EOF() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let mut buf = [0u8; 10];
    let n = access
        .read_at(995, &mut buf)
        .unwrap();
    assert_eq!(n, 5);
    assert_eq!(&buf[..n], b" 100\n");
}

#[test]
fn test_read_at_past_EOF_reads_nothing() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let mut buf = [0u8; 10];
    assert_eq!(
        access
            .read_at(1000, &mut buf)
            .unwrap(),
        0
    );
}

#[test]
fn test_relative_small_blocks_matches_default_blocks() {
    // boundary arithmetic is block-size independent
    let path = ntf_fpath(&NTF_100X10);
    let (_log_a, access_small) = open_log_blocksz(&path, 4);
    let (_log_b, access_default) = open_log(&path);
    for delta in [-7i64, -1, 0, 1, 7, 99] {
        let small = access_small
            .relative(None, delta)
            .unwrap();
        let default = access_default
            .relative(None, delta)
            .unwrap();
        assert_eq!(small, default, "delta {}", delta);
    }
    let eof_small = access_small.cursor_at(1000);
    let eof_default = access_default.cursor_at(1000);
    for delta in [-1i64, -13, -100] {
        let small = access_small
            .relative(Some(&eof_small), delta)
            .unwrap();
        let default = access_default
            .relative(Some(&eof_default), delta)
            .unwrap();
        assert_eq!(small, default, "delta {}", delta);
    }
}

#[test]
fn test_unterminated_final_entry_boundaries() {
    // "alpha\nbeta" — the final entry has no newline terminator
    let (log, access) = open_log(&ntf_fpath(&NTF_NONL));
    assert_eq!(log.size(), 10);
    let one = access
        .relative(None, 1)
        .unwrap();
    assert_eq!(one.offset(), 6);
    let two = access
        .relative(Some(&one), 1)
        .unwrap();
    assert_eq!(two.offset(), 10);
    assert!(two.is_eof());
    let back = access
        .relative(Some(&two), -1)
        .unwrap();
    assert_eq!(back.offset(), 6);
}

#[test]
fn test_empty_log() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_EMPTY));
    let cursor = access
        .relative(None, 0)
        .unwrap();
    assert!(cursor.is_sof());
    assert!(cursor.is_eof());
    let mut buf = [0u8; 4];
    assert_eq!(
        access
            .read_at(0, &mut buf)
            .unwrap(),
        0
    );
}

#[test]
fn test_block_cache_hit_accounting() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let mut buf = [0u8; 10];
    access
        .read_at(0, &mut buf)
        .unwrap();
    let misses_after_first = access.block_cache_misses();
    assert!(misses_after_first >= 1);
    access
        .read_at(0, &mut buf)
        .unwrap();
    assert!(access.block_cache_hits() >= 1);
    assert_eq!(access.block_cache_misses(), misses_after_first);
}

#[test]
fn test_mark_roundtrip_through_access() {
    let (_log, access) = open_log(&ntf_fpath(&NTF_100X10));
    let cursor = access
        .relative(None, 5)
        .unwrap();
    let mark = access.to_mark(&cursor);
    let back = access
        .from_mark(&mark)
        .unwrap();
    assert_eq!(back, cursor);
}
