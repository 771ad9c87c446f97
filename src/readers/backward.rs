// src/readers/backward.rs

//! Direction-reversing decorators over a forward [`LogEntryReader`].
//!
//! Neither decorator re-derives bytes in reverse. Both locate a
//! backward-bounded window with cursor arithmetic, read forward within it,
//! and reverse the collected sequence before delivery — so any forward-only
//! storage format supports backward pagination without a dedicated reverse
//! parser.
//!
//! [`BackwardReader`] buffers one whole page and hands it back in ascending
//! order, for plain backward pagination. [`FluentBackwardReader`] feeds
//! entries one at a time in descending order, for backward incremental
//! search.
//!
//! [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
//! [`BackwardReader`]: crate::readers::backward::BackwardReader
//! [`FluentBackwardReader`]: crate::readers::backward::FluentBackwardReader

use crate::common::{ByteOffset, NavResult, DEFAULT_PAGE_SIZE};
use crate::data::cursor::LogCursor;
use crate::data::entry::{FieldTypes, LogEntry};
use crate::readers::entryreader::{LogEntryConsumer, LogEntryReader};
use crate::readers::rawaccess::LogRawAccess;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Collects up to `capacity` entries whose end does not pass `limit`.
///
/// Bounds a forward read to the backward window [window start, `limit`):
/// when the window start was clamped at start-of-log the forward reader
/// would otherwise run past the window's end.
struct WindowConsumer {
    limit: ByteOffset,
    capacity: usize,
    buffer: Vec<LogEntry>,
}

impl WindowConsumer {
    fn new(
        limit: ByteOffset,
        capacity: usize,
    ) -> WindowConsumer {
        WindowConsumer {
            limit,
            capacity,
            buffer: Vec::new(),
        }
    }
}

impl LogEntryConsumer for WindowConsumer {
    fn consume(
        &mut self,
        entry: LogEntry,
    ) -> NavResult<bool> {
        if self.buffer.len() >= self.capacity
            || entry
                .end_offset()
                .offset()
                > self.limit
        {
            return Ok(false);
        }
        self.buffer
            .push(entry);
        Ok(self.buffer.len() < self.capacity)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BackwardReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Buffered backward pagination over a forward reader.
pub struct BackwardReader<'a> {
    reader: &'a dyn LogEntryReader,
}

impl<'a> BackwardReader<'a> {
    pub fn new(reader: &'a dyn LogEntryReader) -> BackwardReader<'a> {
        BackwardReader { reader }
    }

    /// See [`LogEntryReader::field_types`].
    ///
    /// [`LogEntryReader::field_types`]: crate::readers::entryreader::LogEntryReader#tymethod.field_types
    pub fn field_types(&self) -> FieldTypes {
        self.reader
            .field_types()
    }

    /// Read up to `count` entries ending at `end` (`None` means end-of-log,
    /// the "tail" convention), returned in ascending offset order.
    pub fn read_entries(
        &self,
        access: &dyn LogRawAccess,
        end: Option<&LogCursor>,
        count: usize,
    ) -> NavResult<Vec<LogEntry>> {
        defn!("(end {:?}, count {})", end.map(LogCursor::offset), count);
        if count == 0 {
            defx!("return []; count 0");
            return Ok(Vec::new());
        }
        let limit: ByteOffset = match end {
            Some(cursor) => cursor.offset(),
            None => access
                .log()
                .size(),
        };
        let delta: i64 = i64::try_from(count).unwrap_or(i64::MAX);
        let window_start: LogCursor = access.relative(end, -delta)?;
        let mut consumer = WindowConsumer::new(limit, count);
        self.reader
            .read_entries(access, Some(&window_start), &mut consumer)?;
        defx!("return {} entries", consumer.buffer.len());
        Ok(consumer.buffer)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FluentBackwardReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Streaming backward traversal over a forward reader, for incremental
/// search.
///
/// Walks fixed-size entry windows toward start-of-log; each window is read
/// forward, reversed, and fed entry-by-entry to the consumer — no page
/// buffering across windows. Implements [`LogEntryReader`] itself so scan
/// logic is direction-agnostic.
///
/// [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
pub struct FluentBackwardReader<'a> {
    reader: &'a dyn LogEntryReader,
}

impl<'a> FluentBackwardReader<'a> {
    /// Entries fetched per backward window.
    const WINDOW_SZ: usize = DEFAULT_PAGE_SIZE;

    pub fn new(reader: &'a dyn LogEntryReader) -> FluentBackwardReader<'a> {
        FluentBackwardReader { reader }
    }
}

impl LogEntryReader for FluentBackwardReader<'_> {
    fn field_types(&self) -> FieldTypes {
        self.reader
            .field_types()
    }

    /// Stream entries in descending offset order, ending at `start`
    /// (`None` means end-of-log).
    fn read_entries(
        &self,
        access: &dyn LogRawAccess,
        start: Option<&LogCursor>,
        consumer: &mut dyn LogEntryConsumer,
    ) -> NavResult<()> {
        defn!("(start {:?})", start.map(LogCursor::offset));
        let mut end: LogCursor = match start {
            Some(cursor) => cursor.clone(),
            None => access.cursor_at(
                access
                    .log()
                    .size(),
            ),
        };
        loop {
            let window_start: LogCursor =
                access.relative(Some(&end), -(FluentBackwardReader::WINDOW_SZ as i64))?;
            let mut window =
                WindowConsumer::new(end.offset(), FluentBackwardReader::WINDOW_SZ);
            self.reader
                .read_entries(access, Some(&window_start), &mut window)?;
            if window.buffer.is_empty() {
                // nothing before `end`: start-of-log
                break;
            }
            for entry in window
                .buffer
                .into_iter()
                .rev()
            {
                if !consumer.consume(entry)? {
                    defx!("consumer declined more");
                    return Ok(());
                }
            }
            if window_start.is_sof() {
                break;
            }
            end = window_start;
        }
        defx!("start-of-log reached");
        Ok(())
    }

    fn is_reverse(&self) -> bool {
        true
    }
}
