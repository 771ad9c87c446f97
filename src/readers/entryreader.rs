// src/readers/entryreader.rs

//! Implements the [`LogEntryReader`] and [`LogEntryConsumer`] seams between
//! byte-to-entry parsing and everything layered on top, and the
//! [`BufferedConsumer`] fixed-capacity sink.
//!
//! [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
//! [`LogEntryConsumer`]: crate::readers::entryreader::LogEntryConsumer
//! [`BufferedConsumer`]: crate::readers::entryreader::BufferedConsumer

use crate::common::NavResult;
use crate::data::cursor::LogCursor;
use crate::data::entry::{FieldTypes, LogEntry};
use crate::readers::backward::BackwardReader;
use crate::readers::rawaccess::LogRawAccess;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogEntryConsumer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Receives entries streamed by a [`LogEntryReader`], one at a time, in the
/// read order.
///
/// Returning `Ok(false)` tells the reader to stop feeding. This is a
/// cooperative flow-control contract: a full sink is not an error.
pub trait LogEntryConsumer {
    fn consume(
        &mut self,
        entry: LogEntry,
    ) -> NavResult<bool>;
}

/// Fixed-capacity, insertion-order sink for entries produced by a reader.
///
/// Used as the page buffer of the pagination engine and to materialize the
/// post-match page of a search. Exceeding capacity does not error; the sink
/// declines further entries once full.
#[derive(Debug)]
pub struct BufferedConsumer {
    buffer: Vec<LogEntry>,
    capacity: usize,
}

impl BufferedConsumer {
    pub fn new(capacity: usize) -> BufferedConsumer {
        BufferedConsumer {
            // capacity is caller input and may be huge; grow on demand
            buffer: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.capacity
    }

    pub fn buffer(&self) -> &[LogEntry] {
        &self.buffer
    }

    /// Drain the sink into the ordered sequence it collected.
    pub fn into_buffer(self) -> Vec<LogEntry> {
        self.buffer
    }
}

impl LogEntryConsumer for BufferedConsumer {
    fn consume(
        &mut self,
        entry: LogEntry,
    ) -> NavResult<bool> {
        if self.is_full() {
            return Ok(false);
        }
        self.buffer
            .push(entry);
        Ok(!self.is_full())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogEntryReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Streams entries of a log into a consumer, in one direction.
///
/// Direct implementations read forward. Backward traversal is provided by
/// decorators ([`BackwardReader`], [`FluentBackwardReader`]) composed around
/// a forward reader at construction; a storage format only ever needs a
/// forward parser.
///
/// [`BackwardReader`]: crate::readers::backward::BackwardReader
/// [`FluentBackwardReader`]: crate::readers::backward::FluentBackwardReader
pub trait LogEntryReader {
    /// The field-type schema of entries this reader produces.
    fn field_types(&self) -> FieldTypes;

    /// Stream entries from `start` (`None` means start-of-log for forward
    /// readers, end-of-log for backward decorators) into `consumer`, until
    /// the log is exhausted in the read direction or the consumer declines
    /// more.
    ///
    /// A [`NavError::Format`] aborts the read; entries already delivered
    /// remain valid, no partial entry is ever delivered.
    ///
    /// [`NavError::Format`]: crate::common::NavError
    fn read_entries(
        &self,
        access: &dyn LogRawAccess,
        start: Option<&LogCursor>,
        consumer: &mut dyn LogEntryConsumer,
    ) -> NavResult<()>;

    /// Does this reader deliver entries in descending offset order?
    fn is_reverse(&self) -> bool {
        false
    }
}

/// Read up to `|count|` entries with the direction selected by the sign:
/// positive reads forward from `start` (`None` = start-of-log), negative
/// reads backward ending at `start` (`None` = end-of-log). Entries are
/// returned in ascending offset order either way.
pub fn read_entries_count(
    reader: &dyn LogEntryReader,
    access: &dyn LogRawAccess,
    start: Option<&LogCursor>,
    count: i64,
) -> NavResult<Vec<LogEntry>> {
    defñ!("(start {:?}, count {})", start.map(LogCursor::offset), count);
    if count >= 0 {
        let mut consumer = BufferedConsumer::new(count as usize);
        reader.read_entries(access, start, &mut consumer)?;
        Ok(consumer.into_buffer())
    } else {
        BackwardReader::new(reader).read_entries(access, start, count.unsigned_abs() as usize)
    }
}
