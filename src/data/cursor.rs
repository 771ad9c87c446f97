// src/data/cursor.rs

//! Implements the [`Log`] snapshot and the [`LogCursor`] position within it,
//! including the serialized "mark" token form that round-trips through
//! clients.
//!
//! [`Log`]: crate::data::cursor::Log
//! [`LogCursor`]: crate::data::cursor::LogCursor

use crate::common::{ByteOffset, FPath, NavError, NavResult};

use std::fmt;

use ::serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Serialized form of a [`LogCursor`]; opaque to clients, stable across
/// process restarts referencing the same log.
pub type Mark = String;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Log
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One logical log: a path and its size in bytes at the moment the snapshot
/// was taken.
///
/// A `Log` is immutable per request. The underlying file may grow between
/// requests; a fresh snapshot is taken per call so an in-flight read never
/// sees a concurrent append, and the next call sees all of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Log {
    path: FPath,
    size: ByteOffset,
}

impl Log {
    pub fn new(path: FPath, size: ByteOffset) -> Log {
        Log { path, size }
    }

    #[inline(always)]
    pub fn path(&self) -> &FPath {
        &self.path
    }

    /// Size of the log in bytes at snapshot time.
    #[inline(always)]
    pub const fn size(&self) -> ByteOffset {
        self.size
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl fmt::Display for Log {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{:?} ({} bytes)", self.path, self.size)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogCursor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An opaque position within one [`Log`].
///
/// Totally ordered within its log. Carries the start-of-log and end-of-log
/// sentinel states; the two are mutually exclusive except on an empty log.
/// A cursor is meaningless outside the log it was derived from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LogCursor {
    offset: ByteOffset,
    sof: bool,
    eof: bool,
}

/// Wire form of a [`Mark`] token: the log path (`l`) binds the token to its
/// log, the offset (`o`) is the position.
#[derive(Serialize, Deserialize)]
struct MarkToken {
    l: FPath,
    o: ByteOffset,
}

impl LogCursor {
    /// Create a cursor at `offset` within `log`, clamped to the snapshot
    /// size. Sentinel flags are derived from the snapshot.
    pub fn at(
        offset: ByteOffset,
        log: &Log,
    ) -> LogCursor {
        let offset = offset.min(log.size());
        LogCursor {
            offset,
            sof: offset == 0,
            eof: offset >= log.size(),
        }
    }

    /// Byte offset of this position.
    #[inline(always)]
    pub const fn offset(&self) -> ByteOffset {
        self.offset
    }

    /// At the start of the log?
    #[inline(always)]
    pub const fn is_sof(&self) -> bool {
        self.sof
    }

    /// At the end of the log, i.e. "no more data yet"?
    #[inline(always)]
    pub const fn is_eof(&self) -> bool {
        self.eof
    }

    /// Serialize to a compact mark token bound to `log`.
    pub fn to_mark(
        &self,
        log: &Log,
    ) -> Mark {
        let token = MarkToken {
            l: log.path().clone(),
            o: self.offset,
        };
        // a two-field struct of path + integer cannot fail to serialize
        ::serde_json::to_string(&token).unwrap_or_default()
    }

    /// Deserialize a mark token against `log`.
    ///
    /// Fails with [`NavError::InvalidCursor`] when the token is malformed,
    /// names a different log, or points beyond the current size (a grown log
    /// keeps old marks valid; a mark past EOF means the token references a
    /// different log generation).
    pub fn from_mark(
        mark: &str,
        log: &Log,
    ) -> NavResult<LogCursor> {
        defn!("({:?}, {})", mark, log);
        let token: MarkToken = match ::serde_json::from_str(mark) {
            Ok(token) => token,
            Err(err) => {
                defx!("return InvalidCursor");
                return Err(NavError::InvalidCursor {
                    reason: format!("malformed mark {:?}: {}", mark, err),
                });
            }
        };
        if &token.l != log.path() {
            defx!("return InvalidCursor; foreign log");
            return Err(NavError::InvalidCursor {
                reason: format!("mark for log {:?} used with log {:?}", token.l, log.path()),
            });
        }
        if token.o > log.size() {
            defx!("return InvalidCursor; offset beyond size");
            return Err(NavError::InvalidCursor {
                reason: format!("mark offset {} beyond log size {}", token.o, log.size()),
            });
        }
        let cursor = LogCursor::at(token.o, log);
        defx!("return {:?}", cursor);
        Ok(cursor)
    }
}

impl fmt::Display for LogCursor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match (self.sof, self.eof) {
            (true, true) => write!(f, "@{} (SOF, EOF)", self.offset),
            (true, false) => write!(f, "@{} (SOF)", self.offset),
            (false, true) => write!(f, "@{} (EOF)", self.offset),
            (false, false) => write!(f, "@{}", self.offset),
        }
    }
}
