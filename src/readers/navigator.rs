// src/readers/navigator.rs

//! Implements the [`LogNavigator`], the pagination and search engine over
//! one log: forward/backward pages, random-access windows with edge-case
//! correction, and time-bounded resumable search.
//!
//! [`LogNavigator`]: crate::readers::navigator::LogNavigator

use crate::common::{NavResult, DEFAULT_PAGE_SIZE};
use crate::data::cursor::{LogCursor, Mark};
use crate::data::entry::{LogEntriesResult, LogEntry};
use crate::data::event::{Event, IncrementData};
use crate::readers::backward::{BackwardReader, FluentBackwardReader};
use crate::readers::entryreader::{BufferedConsumer, LogEntryReader};
use crate::readers::rawaccess::LogRawAccess;
use crate::readers::scanner::{
    EventConsumer, ReaderStrategy, Scanner, StopReason, TimeoutReaderStrategy,
};

use std::time::{Duration, Instant};

use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SearchResult
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of one search round.
///
/// An absent `event` with a fresh `last_mark` means "no match yet, resume
/// from the mark" — it is a normal outcome, not a failure.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// Page of up to `|count|` entries read forward from the match, when a
    /// match was found.
    pub entries: Option<LogEntriesResult>,
    /// The recognized event, when a match was found.
    pub event: Option<Event>,
    /// Where a subsequent call should resume.
    pub last_mark: Mark,
    /// Bytes between the original search cursor and the final pointer.
    pub scanned_size: u64,
    /// Wall-clock duration of this round, milliseconds.
    pub scanned_time_ms: u64,
    /// A backward scan ran off the start of the log without a match.
    pub sof_reached: bool,
}

/// Records the first event a scan emits and the pointer to its first entry.
#[derive(Default)]
struct EventCollector {
    event: Option<Event>,
    last_pointer: Option<LogCursor>,
}

impl EventConsumer for EventCollector {
    fn consume(
        &mut self,
        event: Event,
    ) -> NavResult<()> {
        self.last_pointer = Some(
            event
                .pointer()
                .clone(),
        );
        self.event = Some(event);
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogNavigator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Builds pages, windows, and search rounds over one log from a reader and
/// a raw access bound to the same snapshot.
pub struct LogNavigator<'a> {
    reader: &'a dyn LogEntryReader,
    access: &'a dyn LogRawAccess,
}

impl<'a> LogNavigator<'a> {
    pub fn new(
        reader: &'a dyn LogEntryReader,
        access: &'a dyn LogRawAccess,
    ) -> LogNavigator<'a> {
        LogNavigator { reader, access }
    }

    /// One page of entries.
    ///
    /// `count > 0` reads forward up to `count` entries from the mark (or
    /// from start-of-log without one). `count < 0` reads backward up to
    /// `|count|` entries ending at the mark; without one this is the tail:
    /// the last `|count|` entries. `count == 0` selects the random-access
    /// window around the mark.
    pub fn entries(
        &self,
        mark: Option<&str>,
        count: i64,
    ) -> NavResult<LogEntriesResult> {
        defn!("(mark {:?}, count {})", mark, count);
        if count == 0 {
            defx!("delegate to random_access_entries");
            return self.random_access_entries(mark);
        }
        let pointer: Option<LogCursor> = match mark {
            Some(mark) => Some(
                self.access
                    .from_mark(mark)?,
            ),
            None => None,
        };
        let entries: Vec<LogEntry> = if count > 0 {
            let mut consumer = BufferedConsumer::new(count as usize);
            self.reader
                .read_entries(self.access, pointer.as_ref(), &mut consumer)?;
            consumer.into_buffer()
        } else {
            BackwardReader::new(self.reader).read_entries(
                self.access,
                pointer.as_ref(),
                count.unsigned_abs() as usize,
            )?
        };
        defx!("return {} entries", entries.len());
        Ok(LogEntriesResult::new(
            self.reader
                .field_types(),
            entries,
        ))
    }

    /// A window centered just after the mark: `DEFAULT_PAGE_SIZE + 1`
    /// forward entries anchored one entry before the mark, corrected at the
    /// log edges.
    ///
    /// Corrections, in order: a mark resolving to end-of-log falls back to
    /// the last `DEFAULT_PAGE_SIZE` entries (there is nothing to page
    /// forward into); a window that runs into end-of-log while still short
    /// is discarded for the last `DEFAULT_PAGE_SIZE` entries ending there (a
    /// random-access page must not silently come up short near the tail);
    /// otherwise the anchor row is dropped unless stepping the mark back one
    /// entry had no effect.
    pub fn random_access_entries(
        &self,
        mark: Option<&str>,
    ) -> NavResult<LogEntriesResult> {
        defn!("(mark {:?})", mark);
        let field_types = self
            .reader
            .field_types();
        let mut pointer: Option<LogCursor> = match mark {
            Some(mark) => Some(
                self.access
                    .from_mark(mark)?,
            ),
            None => None,
        };
        if let Some(cursor) = pointer.take() {
            let cursor = self
                .access
                .relative(Some(&cursor), 0)?;
            if cursor.is_eof() {
                // end pointer, return the last page simply
                let entries = BackwardReader::new(self.reader).read_entries(
                    self.access,
                    Some(&cursor),
                    DEFAULT_PAGE_SIZE,
                )?;
                defx!("return {} entries; EOF mark fallback", entries.len());
                return Ok(LogEntriesResult::new(field_types, entries));
            }
            pointer = Some(cursor);
        }
        let anchor: Option<LogCursor> = match &pointer {
            Some(cursor) => Some(
                self.access
                    .relative(Some(cursor), -1)?,
            ),
            None => None,
        };
        let mut consumer = BufferedConsumer::new(DEFAULT_PAGE_SIZE + 1);
        self.reader
            .read_entries(self.access, anchor.as_ref(), &mut consumer)?;
        let entries: Vec<LogEntry> = consumer.into_buffer();
        if entries.is_empty() {
            defx!("return 0 entries");
            return Ok(LogEntriesResult::new(field_types, entries));
        }
        let first: &LogEntry = &entries[0];
        let last: &LogEntry = &entries[entries.len() - 1];
        if !first
            .start_offset()
            .is_sof()
            && last
                .end_offset()
                .is_eof()
            && entries.len() < DEFAULT_PAGE_SIZE
        {
            // hm, EOF reached mid-window; the short window is discarded
            let entries = BackwardReader::new(self.reader).read_entries(
                self.access,
                Some(last.end_offset()),
                DEFAULT_PAGE_SIZE,
            )?;
            defx!("return {} entries; short window at EOF fallback", entries.len());
            return Ok(LogEntriesResult::new(field_types, entries));
        }
        if self
            .access
            .distance(pointer.as_ref(), first.start_offset())
            == 0
        {
            // -1 without effect, return from the beginning
            defx!("return {} entries from the first", entries.len());
            return Ok(LogEntriesResult::new(field_types, entries));
        }
        // drop the anchor row, return from the second one
        defx!("return {} entries from the second", entries.len() - 1);
        Ok(LogEntriesResult::new(field_types, entries[1..].to_vec()))
    }

    /// One search round with the default wall-clock budget.
    pub fn search(
        &self,
        scanner: &dyn Scanner,
        mark: Option<&str>,
        count: i64,
    ) -> NavResult<SearchResult> {
        self.search_with_timeout(scanner, mark, count, TimeoutReaderStrategy::TIMEOUT_DEFAULT)
    }

    /// One search round bounded by `timeout`.
    pub fn search_with_timeout(
        &self,
        scanner: &dyn Scanner,
        mark: Option<&str>,
        count: i64,
        timeout: Duration,
    ) -> NavResult<SearchResult> {
        let mut strategy = TimeoutReaderStrategy::new(timeout);
        self.search_with_strategy(scanner, &mut strategy, mark, count)
    }

    /// One search round bounded by a caller-supplied strategy.
    ///
    /// Searches forward for `count >= 0`, backward for `count < 0`. When a
    /// match is found, up to `|count|` entries are read forward from it and
    /// returned alongside the event. Without a match the result carries a
    /// resume mark: at start-of-log when a backward scan exhausted the log,
    /// otherwise wherever the reader left off.
    pub fn search_with_strategy(
        &self,
        scanner: &dyn Scanner,
        strategy: &mut dyn ReaderStrategy,
        mark: Option<&str>,
        count: i64,
    ) -> NavResult<SearchResult> {
        defn!("(mark {:?}, count {})", mark, count);
        let started = Instant::now();
        let search_pointer: Option<LogCursor> = match mark {
            Some(mark) => Some(
                self.access
                    .from_mark(mark)?,
            ),
            None => None,
        };
        let mut inc_data = IncrementData::new(search_pointer.clone());
        let mut collector = EventCollector::default();
        let stop: Option<StopReason> = if count < 0 {
            let backward = FluentBackwardReader::new(self.reader);
            scanner.find(&backward, strategy, self.access, &mut inc_data, &mut collector)?
        } else {
            scanner.find(self.reader, strategy, self.access, &mut inc_data, &mut collector)?
        };
        let mut entries: Option<LogEntriesResult> = None;
        let mut sof_reached: bool = false;
        let last_pointer: LogCursor = match collector.last_pointer {
            Some(last_pointer) => {
                // found; materialize the page after the match
                defo!("match at {}", last_pointer);
                let mut consumer = BufferedConsumer::new(count.unsigned_abs() as usize);
                self.reader
                    .read_entries(self.access, Some(&last_pointer), &mut consumer)?;
                entries = Some(LogEntriesResult::new(
                    self.reader
                        .field_types(),
                    consumer.into_buffer(),
                ));
                last_pointer
            }
            None if stop == Some(StopReason::StartOfLogReached) => {
                sof_reached = true;
                self.access
                    .relative(None, 0)?
            }
            None => {
                // nothing found in this round; resume where the reader
                // left off
                match inc_data.next_offset() {
                    Some(cursor) => cursor.clone(),
                    None => self
                        .access
                        .relative(None, 0)?,
                }
            }
        };
        let result = SearchResult {
            entries,
            event: collector.event,
            last_mark: self
                .access
                .to_mark(&last_pointer),
            scanned_size: self
                .access
                .distance(search_pointer.as_ref(), &last_pointer)
                .unsigned_abs(),
            scanned_time_ms: started
                .elapsed()
                .as_millis() as u64,
            sof_reached,
        };
        defx!(
            "return event {}, scanned_size {}, sof_reached {}",
            result.event.is_some(),
            result.scanned_size,
            result.sof_reached
        );
        Ok(result)
    }
}
