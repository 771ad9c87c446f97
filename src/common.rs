// src/common.rs
//
// common imports, type aliases, and shared result/error types (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// paths, offsets, counts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;

/// Offset into a log in bytes.
pub type ByteOffset = u64;

/// Signed distance between two log positions in bytes.
pub type ByteDistance = i64;

/// Count of entries, cache lookups, or other occurrences.
pub type Count = u64;

/// Sequence of bytes.
pub type Bytes = Vec<u8>;

/// Single-byte newline char as u8.
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

/// Default number of entries in a UI page; sizes random-access windows and
/// the backward "tail" fallbacks.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Failures surfaced by navigation and search calls.
///
/// None of these are retried internally. A scan that runs out of time is
/// _not_ an error; it returns a fresh resume mark instead.
#[derive(Debug, ::thiserror::Error)]
pub enum NavError {
    /// Malformed or foreign mark token; a client-input error.
    #[error("invalid cursor token: {reason}")]
    InvalidCursor { reason: String },

    /// Bytes at the expected entry boundary do not parse as an entry.
    /// Aborts the in-progress read or scan; entries already delivered to a
    /// consumer before the failure remain valid.
    #[error("malformed entry in {path:?} at offset {offset}: {reason}")]
    Format {
        path: FPath,
        offset: ByteOffset,
        reason: String,
    },

    /// The referenced log does not exist in the given source.
    #[error("log not found: {path:?}")]
    NotFound { path: FPath },

    /// A scan pattern failed to compile; a client-input error.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] ::regex::Error),

    /// Underlying storage failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type NavResult<T> = std::result::Result<T, NavError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ResultFind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Extended, for entry and boundary stepping functions.
///
/// Distinguishes "found the next thing" from "ran off the end of the data"
/// without overloading `Option` inside `Result`.
#[derive(Debug)]
pub enum ResultFind<T, E> {
    /// Contains the success data
    Found(T),
    /// Log is exhausted in the stepped direction, nothing to return, but no
    /// bad errors happened
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultFind<T, E> {
    /// Returns `true` if the result is [`Found`, `Done`].
    #[allow(dead_code)]
    #[must_use = "if you intended to assert that this is ok, consider `.unwrap()` instead"]
    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(*self, ResultFind::Found(_) | ResultFind::Done)
    }

    /// Returns `true` if the result is [`Found`].
    #[inline(always)]
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultFind::Found(_))
    }

    /// Returns `true` if the result is [`Done`].
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultFind::Done)
    }

    /// Returns `true` if the result is [`Err`].
    #[allow(dead_code)]
    #[must_use = "if you intended to assert that this is err, consider `.unwrap_err()` instead"]
    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        matches!(*self, ResultFind::Err(_))
    }

    /// Converts from `ResultFind<T, E>` to [`Option<T>`].
    ///
    /// Converts `self` into an [`Option<T>`], consuming `self`,
    /// and discarding the error, if any.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn ok(self) -> Option<T> {
        match self {
            ResultFind::Found(x) => Some(x),
            ResultFind::Done => None,
            ResultFind::Err(_) => None,
        }
    }
}

impl<T, E> std::fmt::Display for ResultFind<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultFind::Found(_) => {
                write!(f, "ResultFind::Found")
            }
            ResultFind::Done => {
                write!(f, "ResultFind::Done")
            }
            ResultFind::Err(err) => {
                write!(f, "ResultFind::Err({})", err)
            }
        }
    }
}
