// src/data/event.rs

//! Implements an [`Event`], the unit a scan match produces, and the
//! [`IncrementData`] progress token that makes multi-round scanning over
//! large logs feasible without re-scanning.
//!
//! [`Event`]: crate::data::event::Event
//! [`IncrementData`]: crate::data::event::IncrementData

use crate::data::cursor::LogCursor;
use crate::data::entry::LogEntry;

use ::serde::Serialize;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One or more correlated entries recognized by a scan, plus the pointer at
/// which a subsequent call resumes: the first entry's start offset.
#[derive(Clone, Debug, Serialize)]
pub struct Event {
    entries: Vec<LogEntry>,
    pointer: LogCursor,
}

impl Event {
    /// Create an `Event` from at least one entry.
    pub fn new(entries: Vec<LogEntry>) -> Event {
        assert!(!entries.is_empty(), "an Event requires at least one entry");
        let pointer = entries[0]
            .start_offset()
            .clone();
        Event { entries, pointer }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Start offset of the first correlated entry.
    #[inline(always)]
    pub const fn pointer(&self) -> &LogCursor {
        &self.pointer
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IncrementData
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Progress token of one scan invocation.
///
/// Owned by a single call and returned to the caller; a subsequent call
/// seeded with the contained cursor continues scanning from exactly where
/// the reader left off. An explicit value threaded through calls, never
/// shared state.
#[derive(Clone, Debug, Default)]
pub struct IncrementData {
    next_offset: Option<LogCursor>,
}

impl IncrementData {
    pub fn new(next_offset: Option<LogCursor>) -> IncrementData {
        IncrementData { next_offset }
    }

    /// The cursor to resume scanning from; `None` before any entry was
    /// consumed and no seed was given.
    pub fn next_offset(&self) -> Option<&LogCursor> {
        self.next_offset
            .as_ref()
    }

    pub fn set_next_offset(
        &mut self,
        next_offset: Option<LogCursor>,
    ) {
        self.next_offset = next_offset;
    }
}
