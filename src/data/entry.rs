// src/data/entry.rs

//! Implements a [`LogEntry`], one parsed record of a log, and the field-type
//! schema a reader attaches to the pages it produces.
//!
//! [`LogEntry`]: crate::data::entry::LogEntry

use crate::data::cursor::LogCursor;

use std::fmt;

use ::serde::Serialize;

/// Name of one parsed field of an entry.
pub type FieldName = String;

/// Declared type of a field; lets a caller render columns without a second
/// round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FieldType {
    String,
    Integer,
}

/// Value of one parsed field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
}

impl FieldValue {
    /// The contained string, if this is a string field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            FieldValue::Integer(_) => None,
        }
    }
}

/// Ordered field-type schema of a reader.
pub type FieldTypes = Vec<(FieldName, FieldType)>;

/// Ordered field data of one entry. Sparse: an entry need not populate every
/// field of its reader's schema.
pub type Fields = Vec<(FieldName, FieldValue)>;

/// Field holding the unparsed text of an entry.
pub const FIELD_RAW: &str = "raw";
/// Field holding a detected severity token, when one is present.
pub const FIELD_SEVERITY: &str = "severity";
/// Field holding the entry length in bytes, terminator included.
pub const FIELD_BYTES: &str = "bytes";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogEntry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One parsed record of a log.
///
/// Bounded by its `start_offset` and `end_offset` cursors. Entries produced
/// by one reader invocation are strictly ordered by offset and contiguous:
/// each entry's start equals the previous entry's end, under one read
/// direction.
#[derive(Clone, PartialEq, Serialize)]
pub struct LogEntry {
    start_offset: LogCursor,
    end_offset: LogCursor,
    fields: Fields,
}

impl LogEntry {
    pub fn new(
        start_offset: LogCursor,
        end_offset: LogCursor,
        fields: Fields,
    ) -> LogEntry {
        LogEntry {
            start_offset,
            end_offset,
            fields,
        }
    }

    /// Cursor at the first byte of this entry.
    #[inline(always)]
    pub const fn start_offset(&self) -> &LogCursor {
        &self.start_offset
    }

    /// Cursor one past the last byte of this entry.
    #[inline(always)]
    pub const fn end_offset(&self) -> &LogCursor {
        &self.end_offset
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Value of the named field, if this entry populated it.
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The unparsed text of this entry, if the reader provided it.
    pub fn raw(&self) -> Option<&str> {
        self.field(FIELD_RAW)
            .and_then(FieldValue::as_str)
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("start_offset", &self.start_offset.offset())
            .field("end_offset", &self.end_offset.offset())
            .field("raw", &self.raw())
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogEntriesResult
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One page or window of entries, with the field-type schema of the reader
/// that produced them.
#[derive(Clone, Debug, Serialize)]
pub struct LogEntriesResult {
    field_types: FieldTypes,
    entries: Vec<LogEntry>,
}

impl LogEntriesResult {
    pub fn new(
        field_types: FieldTypes,
        entries: Vec<LogEntry>,
    ) -> LogEntriesResult {
        LogEntriesResult {
            field_types,
            entries,
        }
    }

    pub fn field_types(&self) -> &FieldTypes {
        &self.field_types
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
