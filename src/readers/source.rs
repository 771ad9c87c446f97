// src/readers/source.rs

//! Implements the [`LogSource`] collaborator contract — who knows which
//! logs exist and how large they currently are — and [`FileLogSource`], the
//! plain-file supplier.
//!
//! [`LogSource`]: crate::readers::source::LogSource
//! [`FileLogSource`]: crate::readers::source::FileLogSource

use crate::common::{NavError, NavResult};
use crate::data::cursor::Log;
use crate::readers::entryreader::LogEntryReader;
use crate::readers::rawaccess::{LineLogAccess, LogRawAccess};
use crate::readers::textreader::TextLogReader;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Supplies [`Log`] snapshots, raw access over them, and the reader that
/// parses their entries.
///
/// The size of a snapshot is resolved at call time, never cached: a page
/// computed in one call reflects the log's size at that call only, so a
/// concurrent append is invisible to an in-flight read and fully visible to
/// the next call.
///
/// [`Log`]: crate::data::cursor::Log
pub trait LogSource {
    /// A fresh snapshot of the named log; [`NavError::NotFound`] when the
    /// source has no such log.
    ///
    /// [`NavError::NotFound`]: crate::common::NavError
    fn log(
        &self,
        path: &str,
    ) -> NavResult<Log>;

    /// Open raw access bound to `log`.
    fn access(
        &self,
        log: &Log,
    ) -> NavResult<Box<dyn LogRawAccess>>;

    /// The reader parsing this source's entries.
    fn reader(&self) -> &dyn LogEntryReader;
}

/// [`LogSource`] over plain text files addressed by filesystem path.
///
/// [`LogSource`]: crate::readers::source::LogSource
#[derive(Debug, Default)]
pub struct FileLogSource {
    reader: TextLogReader,
}

impl FileLogSource {
    pub fn new() -> FileLogSource {
        FileLogSource {
            reader: TextLogReader::new(),
        }
    }
}

impl LogSource for FileLogSource {
    fn log(
        &self,
        path: &str,
    ) -> NavResult<Log> {
        defñ!("({:?})", path);
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(NavError::NotFound {
                    path: path.to_owned(),
                });
            }
            Err(err) => return Err(NavError::Io(err)),
        };
        if !metadata.is_file() {
            return Err(NavError::NotFound {
                path: path.to_owned(),
            });
        }
        Ok(Log::new(path.to_owned(), metadata.len()))
    }

    fn access(
        &self,
        log: &Log,
    ) -> NavResult<Box<dyn LogRawAccess>> {
        Ok(Box::new(LineLogAccess::open(log.clone())?))
    }

    fn reader(&self) -> &dyn LogEntryReader {
        &self.reader
    }
}
