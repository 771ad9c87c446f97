// src/readers/scanner.rs

//! Incremental pattern scanning: match entries against a pattern while a
//! continuation strategy allows, yielding correlated [`Event`]s and keeping
//! resumable progress in [`IncrementData`].
//!
//! [`Event`]: crate::data::event::Event
//! [`IncrementData`]: crate::data::event::IncrementData

use crate::common::NavResult;
use crate::data::cursor::LogCursor;
use crate::data::entry::LogEntry;
use crate::data::event::{Event, IncrementData};
use crate::readers::entryreader::{LogEntryConsumer, LogEntryReader};
use crate::readers::rawaccess::LogRawAccess;

use std::time::{Duration, Instant};

use ::regex::Regex;
use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// continuation strategy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Why a scan stopped before exhausting the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The wall-clock budget elapsed; resume from the progress token.
    DeadlineElapsed,
    /// A match was committed; no further entries are scanned.
    MatchCommitted,
    /// A backward scan streamed the entry at start-of-log; there is nothing
    /// further back.
    StartOfLogReached,
}

/// Verdict of one continue-check. Evaluated exactly once per streamed entry,
/// after the entry was matched and progress recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDecision {
    Continue,
    Stop(StopReason),
}

/// Pluggable continuation bound consulted after every streamed entry.
///
/// Polled, not preemptive: worst-case overrun past a deadline is the cost of
/// parsing one more entry.
pub trait ReaderStrategy {
    fn continue_reading(
        &mut self,
        entry: &LogEntry,
    ) -> ScanDecision;
}

/// Wall-clock time budget for one scan round.
#[derive(Debug)]
pub struct TimeoutReaderStrategy {
    deadline: Instant,
}

impl TimeoutReaderStrategy {
    /// Default budget of one scan round.
    pub const TIMEOUT_DEFAULT: Duration = Duration::from_millis(3000);

    pub fn new(budget: Duration) -> TimeoutReaderStrategy {
        TimeoutReaderStrategy {
            deadline: Instant::now() + budget,
        }
    }
}

impl Default for TimeoutReaderStrategy {
    fn default() -> TimeoutReaderStrategy {
        TimeoutReaderStrategy::new(TimeoutReaderStrategy::TIMEOUT_DEFAULT)
    }
}

impl ReaderStrategy for TimeoutReaderStrategy {
    fn continue_reading(
        &mut self,
        _entry: &LogEntry,
    ) -> ScanDecision {
        if Instant::now() >= self.deadline {
            return ScanDecision::Stop(StopReason::DeadlineElapsed);
        }
        ScanDecision::Continue
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scanner
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Receives the [`Event`]s a scan recognizes.
///
/// [`Event`]: crate::data::event::Event
pub trait EventConsumer {
    fn consume(
        &mut self,
        event: Event,
    ) -> NavResult<()>;
}

/// Pattern matching across a stream of entries.
///
/// `find` drives `reader` from the cursor seeded in `inc_data` (forward
/// readers start at start-of-log when unseeded, backward decorators at
/// end-of-log), matching entry-by-entry until a match is committed, the
/// strategy calls a stop, or the log is exhausted in the read direction.
/// `inc_data` is kept current after every fully-consumed entry, so a scan
/// stopped by its budget resumes exactly where the reader left off.
pub trait Scanner {
    /// Returns the reason scanning stopped, or `None` when the reader
    /// exhausted the log.
    fn find(
        &self,
        reader: &dyn LogEntryReader,
        strategy: &mut dyn ReaderStrategy,
        access: &dyn LogRawAccess,
        inc_data: &mut IncrementData,
        consumer: &mut dyn EventConsumer,
    ) -> NavResult<Option<StopReason>>;
}

/// Streams entries into the match/decide cycle on behalf of a scanner.
struct ScanDriver<'a> {
    pattern: &'a Regex,
    strategy: &'a mut dyn ReaderStrategy,
    inc_data: &'a mut IncrementData,
    events: &'a mut dyn EventConsumer,
    reverse: bool,
    last_pointer: Option<LogCursor>,
    stop: Option<StopReason>,
}

impl LogEntryConsumer for ScanDriver<'_> {
    fn consume(
        &mut self,
        entry: LogEntry,
    ) -> NavResult<bool> {
        // progress first: where the reader left off after this entry
        let resume: &LogCursor = if self.reverse {
            entry.start_offset()
        } else {
            entry.end_offset()
        };
        self.inc_data
            .set_next_offset(Some(resume.clone()));
        // match
        if let Some(raw) = entry.raw() {
            if self
                .pattern
                .is_match(raw)
            {
                self.last_pointer = Some(
                    entry
                        .start_offset()
                        .clone(),
                );
                self.events
                    .consume(Event::new(vec![entry.clone()]))?;
            }
        }
        // decide, one tagged verdict per entry
        let decision: ScanDecision = if self.last_pointer.is_some() {
            ScanDecision::Stop(StopReason::MatchCommitted)
        } else if self.reverse
            && entry
                .start_offset()
                .is_sof()
        {
            ScanDecision::Stop(StopReason::StartOfLogReached)
        } else {
            self.strategy
                .continue_reading(&entry)
        };
        match decision {
            ScanDecision::Continue => Ok(true),
            ScanDecision::Stop(reason) => {
                self.stop = Some(reason);
                Ok(false)
            }
        }
    }
}

/// Matches single entries against a regular expression over their `raw`
/// field; each match becomes a one-entry [`Event`].
///
/// [`Event`]: crate::data::event::Event
#[derive(Debug)]
pub struct RegexScanner {
    pattern: Regex,
}

impl RegexScanner {
    /// Compile `pattern`; fails with [`NavError::Pattern`] on an invalid
    /// expression.
    ///
    /// [`NavError::Pattern`]: crate::common::NavError
    pub fn new(pattern: &str) -> NavResult<RegexScanner> {
        let pattern = Regex::new(pattern)?;
        Ok(RegexScanner { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern
            .as_str()
    }
}

impl Scanner for RegexScanner {
    fn find(
        &self,
        reader: &dyn LogEntryReader,
        strategy: &mut dyn ReaderStrategy,
        access: &dyn LogRawAccess,
        inc_data: &mut IncrementData,
        consumer: &mut dyn EventConsumer,
    ) -> NavResult<Option<StopReason>> {
        defn!("(pattern {:?})", self.pattern.as_str());
        let start: Option<LogCursor> = inc_data
            .next_offset()
            .cloned();
        let mut driver = ScanDriver {
            pattern: &self.pattern,
            strategy,
            inc_data,
            events: consumer,
            reverse: reader.is_reverse(),
            last_pointer: None,
            stop: None,
        };
        reader.read_entries(access, start.as_ref(), &mut driver)?;
        defx!("return {:?}", driver.stop);
        Ok(driver.stop)
    }
}
