// src/readers/textreader.rs

//! Implements [`TextLogReader`], a line-oriented [`LogEntryReader`]: one
//! entry per newline-delimited line, parsed through the [`LogRawAccess`]
//! surface only, so it works over any storage the access can serve.
//!
//! [`TextLogReader`]: crate::readers::textreader::TextLogReader
//! [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
//! [`LogRawAccess`]: crate::readers::rawaccess::LogRawAccess

use crate::common::{ByteOffset, NLu8, NavError, NavResult, ResultFind};
use crate::data::cursor::LogCursor;
use crate::data::entry::{
    FieldType, FieldTypes, FieldValue, Fields, LogEntry, FIELD_BYTES, FIELD_RAW, FIELD_SEVERITY,
};
use crate::readers::entryreader::{LogEntryConsumer, LogEntryReader};
use crate::readers::rawaccess::LogRawAccess;

use ::more_asserts::debug_assert_gt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// [`TextLogReader::parse_entry`] stepping results.
///
/// [`TextLogReader::parse_entry`]: self::TextLogReader#method.parse_entry
pub type ResultFindEntry = ResultFind<LogEntry, NavError>;

/// Severity tokens recognized in entry text, canonical forms.
const SEVERITY_TOKENS: [&str; 7] = ["FATAL", "ERROR", "WARNING", "WARN", "INFO", "DEBUG", "TRACE"];

/// How many leading whitespace-split tokens of an entry are searched for a
/// severity token.
const SEVERITY_SCAN_TOKENS: usize = 8;

/// Longest entry accepted before the bytes are declared malformed. A text
/// log line beyond this is not a line, it is a parse gone off the rails.
const ENTRY_SZ_MAX: usize = 0x4000;

/// A line-oriented [`LogEntryReader`].
///
/// One entry per line; the entry includes its newline terminator, so entries
/// of one read are contiguous. Fields: `raw` (line text without the
/// terminator), `severity` (canonical severity token, when one appears near
/// the start of the line), `bytes` (entry length, terminator included).
///
/// Strict about its input: non-UTF-8 bytes and oversized lines abort the
/// read with a [`NavError::Format`].
///
/// [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
/// [`NavError::Format`]: crate::common::NavError
#[derive(Debug, Default)]
pub struct TextLogReader {}

impl TextLogReader {
    pub fn new() -> TextLogReader {
        TextLogReader {}
    }

    /// Find a canonical severity token among the leading tokens of `raw`.
    fn find_severity(raw: &str) -> Option<&'static str> {
        for token in raw
            .split_whitespace()
            .take(SEVERITY_SCAN_TOKENS)
        {
            let trimmed = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
            for severity in SEVERITY_TOKENS {
                if trimmed.eq_ignore_ascii_case(severity) {
                    return Some(severity);
                }
            }
        }
        None
    }

    /// Parse the entry starting at boundary `start`.
    ///
    /// `Done` when `start` is at or past end-of-log; `Err` when the bytes do
    /// not form a well-formed entry.
    pub(crate) fn parse_entry(
        &self,
        access: &dyn LogRawAccess,
        start: ByteOffset,
    ) -> ResultFindEntry {
        let log = access.log();
        if start >= log.size() {
            return ResultFind::Done;
        }
        let start_cursor: LogCursor = access.cursor_at(start);
        let end_cursor: LogCursor = match access.relative(Some(&start_cursor), 1) {
            Ok(cursor) => cursor,
            Err(err) => return ResultFind::Err(err),
        };
        let end: ByteOffset = end_cursor.offset();
        debug_assert_gt!(end, start, "no progress resolving entry end at {}", start);
        let len: usize = (end - start) as usize;
        if len > ENTRY_SZ_MAX {
            return ResultFind::Err(NavError::Format {
                path: log
                    .path()
                    .clone(),
                offset: start,
                reason: format!("entry of {} bytes exceeds the {} byte maximum", len, ENTRY_SZ_MAX),
            });
        }
        let mut buf: Vec<u8> = vec![0; len];
        match access.read_at(start, &mut buf) {
            Ok(_n) => {}
            Err(err) => return ResultFind::Err(err),
        }
        // the newline terminator is part of the entry but not of its text
        let text_len: usize = if buf.last() == Some(&NLu8) { len - 1 } else { len };
        let raw: &str = match std::str::from_utf8(&buf[..text_len]) {
            Ok(raw) => raw,
            Err(err) => {
                return ResultFind::Err(NavError::Format {
                    path: log
                        .path()
                        .clone(),
                    offset: start,
                    reason: format!("entry is not valid UTF-8: {}", err),
                });
            }
        };
        let mut fields: Fields = Vec::with_capacity(3);
        fields.push((FIELD_RAW.to_owned(), FieldValue::String(raw.to_owned())));
        if let Some(severity) = TextLogReader::find_severity(raw) {
            fields.push((FIELD_SEVERITY.to_owned(), FieldValue::String(severity.to_owned())));
        }
        fields.push((FIELD_BYTES.to_owned(), FieldValue::Integer(len as i64)));
        ResultFind::Found(LogEntry::new(start_cursor, end_cursor, fields))
    }
}

impl LogEntryReader for TextLogReader {
    fn field_types(&self) -> FieldTypes {
        vec![
            (FIELD_RAW.to_owned(), FieldType::String),
            (FIELD_SEVERITY.to_owned(), FieldType::String),
            (FIELD_BYTES.to_owned(), FieldType::Integer),
        ]
    }

    fn read_entries(
        &self,
        access: &dyn LogRawAccess,
        start: Option<&LogCursor>,
        consumer: &mut dyn LogEntryConsumer,
    ) -> NavResult<()> {
        defn!("(start {:?})", start.map(LogCursor::offset));
        // snap into the entry boundary at or after the given position
        let mut fo: ByteOffset = match start {
            Some(cursor) => access
                .relative(Some(cursor), 0)?
                .offset(),
            None => 0,
        };
        loop {
            match self.parse_entry(access, fo) {
                ResultFind::Found(entry) => {
                    let end: ByteOffset = entry
                        .end_offset()
                        .offset();
                    if !consumer.consume(entry)? {
                        defo!("consumer declined more at {}", end);
                        break;
                    }
                    fo = end;
                }
                ResultFind::Done => {
                    break;
                }
                ResultFind::Err(err) => {
                    defx!("return Err({})", err);
                    return Err(err);
                }
            }
        }
        defx!("read up to {}", fo);
        Ok(())
    }
}
