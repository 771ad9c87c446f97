// src/tests/common.rs
//
// shared test fixtures: temporary log files and openers

use crate::common::FPath;
use crate::data::cursor::Log;
use crate::readers::rawaccess::LineLogAccess;
use crate::readers::source::{FileLogSource, LogSource};

use std::io::Write;

use ::lazy_static::lazy_static;
use ::tempfile::NamedTempFile;

/// Create a temporary file with the given text content.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Create a temporary file with the given bytes.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = NamedTempFile::new().unwrap();
    ntf.write_all(data)
        .unwrap();
    ntf.flush()
        .unwrap();
    ntf
}

/// Helper to a [`NamedTempFile`] path as a [`FPath`].
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    ntf.path()
        .to_str()
        .unwrap()
        .to_owned()
}

/// `count` entries of exactly 10 bytes each: `"entry 001\n"` … `"entry NNN\n"`.
pub fn data_entries_10b(count: usize) -> String {
    (1..=count)
        .map(|i| format!("entry {:03}\n", i))
        .collect()
}

lazy_static! {
    pub static ref NTF_EMPTY: NamedTempFile = create_temp_file("");
    /// 100 entries, 10 bytes each, 1000 bytes total
    pub static ref NTF_100X10: NamedTempFile = create_temp_file(&data_entries_10b(100));
    /// 9 entries, 10 bytes each, 90 bytes total
    pub static ref NTF_9X10: NamedTempFile = create_temp_file(&data_entries_10b(9));
    /// final entry unterminated
    pub static ref NTF_NONL: NamedTempFile = create_temp_file("alpha\nbeta");
    /// mixed-severity lines, one ERROR
    pub static ref NTF_SEV: NamedTempFile = create_temp_file(
        "boot sequence started\n\
         INFO all services up\n\
         [warn] disk space low\n\
         2024-06-01 ERROR checksum mismatch in segment 7\n\
         recovery complete\n"
    );
    /// second entry is not valid UTF-8
    pub static ref NTF_BAD_UTF8: NamedTempFile =
        create_temp_file_bytes(b"good line\n\xFF\xFE broken\n");
}

/// Open a fresh `Log` snapshot and a `LineLogAccess` over `path`.
pub fn open_log(path: &FPath) -> (Log, LineLogAccess) {
    open_log_blocksz(path, crate::readers::rawaccess::BLOCKSZ_DEFAULT)
}

/// Same, reading `blocksz`-byte blocks (small sizes exercise cross-block
/// boundary scans).
pub fn open_log_blocksz(
    path: &FPath,
    blocksz: usize,
) -> (Log, LineLogAccess) {
    let source = FileLogSource::new();
    let log = source
        .log(path)
        .unwrap();
    let access = LineLogAccess::open_with_blocksz(log.clone(), blocksz).unwrap();
    (log, access)
}
