// src/readers/rawaccess.rs

//! Implements [`LogRawAccess`], positional arithmetic over one log, and
//! [`LineLogAccess`], the line-oriented file backend: block-granular cached
//! reads with newline scanning to resolve entry boundaries.
//!
//! [`LogRawAccess`]: crate::readers::rawaccess::LogRawAccess
//! [`LineLogAccess`]: crate::readers::rawaccess::LineLogAccess

use crate::common::{ByteDistance, ByteOffset, Count, NLu8, NavResult};
use crate::data::cursor::{Log, LogCursor, Mark};

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex, MutexGuard};

use ::lru::LruCache;
use ::memchr::{memchr, memrchr};
use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogRawAccess
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Binds a [`Log`] snapshot to positional arithmetic: mark round-tripping,
/// entry-relative cursor movement, signed byte distances, and raw byte
/// access for readers layered on top.
///
/// Pure positional queries; underlying storage reads may occur lazily to
/// resolve entry boundaries. Implementations must be safe for concurrent
/// invocation against the same log by independent cursors.
///
/// [`Log`]: crate::data::cursor::Log
pub trait LogRawAccess {
    /// The bound log snapshot. Size is fixed for the lifetime of this
    /// access; a new request takes a new access over a new snapshot.
    fn log(&self) -> &Log;

    /// A new cursor moved by `delta_entries` whole entries from `cursor`
    /// (`None` means start-of-log).
    ///
    /// `delta_entries == 0` snaps to the nearest entry boundary at or after
    /// the cursor. Deltas that would run below SOF or above EOF clamp to the
    /// respective sentinel rather than failing.
    fn relative(
        &self,
        cursor: Option<&LogCursor>,
        delta_entries: i64,
    ) -> NavResult<LogCursor>;

    /// Read raw bytes at `offset` into `buf`, clamped to the snapshot size.
    /// Returns the number of bytes read; `0` at or past end-of-log.
    fn read_at(
        &self,
        offset: ByteOffset,
        buf: &mut [u8],
    ) -> NavResult<usize>;

    /// A cursor at `offset` within the bound log, clamped to its size.
    fn cursor_at(
        &self,
        offset: ByteOffset,
    ) -> LogCursor {
        LogCursor::at(offset, self.log())
    }

    /// Signed byte distance from `a` to `b`; `None` means start-of-log.
    ///
    /// For all cursors of one log, `distance(a, b) == -distance(b, a)`.
    fn distance(
        &self,
        a: Option<&LogCursor>,
        b: &LogCursor,
    ) -> ByteDistance {
        let a_offset: ByteOffset = a
            .map(LogCursor::offset)
            .unwrap_or(0);
        b.offset() as ByteDistance - a_offset as ByteDistance
    }

    /// Deserialize a mark token into a cursor of the bound log.
    fn from_mark(
        &self,
        mark: &str,
    ) -> NavResult<LogCursor> {
        LogCursor::from_mark(mark, self.log())
    }

    /// Serialize a cursor of the bound log into a mark token.
    fn to_mark(
        &self,
        cursor: &LogCursor,
    ) -> Mark {
        cursor.to_mark(self.log())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Blocks and LineLogAccess
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One cached unit of raw log bytes.
pub type Block = Vec<u8>;
/// Thread-safe copy-free sharing of a [`Block`].
pub type BlockP = Arc<Block>;
/// Index of a [`Block`] within a log: byte offset divided by block size.
pub type BlockOffset = u64;
/// Internal LRU cache of read blocks.
type BlocksLRUCache = LruCache<BlockOffset, BlockP>;

/// Default block size in bytes.
pub const BLOCKSZ_DEFAULT: usize = 0x1000;

/// File handle plus block cache; kept behind one lock so a single
/// `LineLogAccess` may serve concurrent requests with independent cursors
/// (there is no shared read position outside this guard).
struct BlockCache {
    file: File,
    lru: BlocksLRUCache,
    hits: Count,
    misses: Count,
}

/// Line-oriented [`LogRawAccess`] over a plain text file.
///
/// Entry boundaries are newline-delimited: an entry starts at offset `0` or
/// one past a newline, and ends one past its own newline (or at end-of-log
/// for an unterminated final line). Boundary resolution reads the file in
/// fixed-size blocks through an LRU cache and scans them with `memchr`.
pub struct LineLogAccess {
    log: Log,
    blocksz: usize,
    blocks: Mutex<BlockCache>,
}

impl fmt::Debug for LineLogAccess {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LineLogAccess")
            .field("log", &self.log)
            .field("blocksz", &self.blocksz)
            .finish()
    }
}

impl LineLogAccess {
    /// Internal LRU cache size (blocks).
    const BLOCK_LRU_CACHE_SZ: usize = 8;

    /// Open an access over `log` with the default block size.
    pub fn open(log: Log) -> NavResult<LineLogAccess> {
        LineLogAccess::open_with_blocksz(log, BLOCKSZ_DEFAULT)
    }

    /// Open an access over `log` reading `blocksz`-byte blocks.
    pub fn open_with_blocksz(
        log: Log,
        blocksz: usize,
    ) -> NavResult<LineLogAccess> {
        defñ!("({}, blocksz {})", log, blocksz);
        assert_ne!(blocksz, 0, "blocksz is zero");
        let file = File::open(log.path())?;
        Ok(LineLogAccess {
            log,
            blocksz,
            blocks: Mutex::new(BlockCache {
                file,
                lru: BlocksLRUCache::new(
                    std::num::NonZeroUsize::new(LineLogAccess::BLOCK_LRU_CACHE_SZ).unwrap(),
                ),
                hits: 0,
                misses: 0,
            }),
        })
    }

    /// `Count` of block lookups served from the cache.
    pub fn block_cache_hits(&self) -> Count {
        self.blocks_guard()
            .hits
    }

    /// `Count` of block lookups that went to storage.
    pub fn block_cache_misses(&self) -> Count {
        self.blocks_guard()
            .misses
    }

    fn blocks_guard(&self) -> MutexGuard<'_, BlockCache> {
        match self.blocks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read the block at `blockoffset`, from cache when possible.
    ///
    /// The final block of a log is short; all others are `blocksz` bytes.
    fn read_block(
        &self,
        blockoffset: BlockOffset,
    ) -> NavResult<BlockP> {
        let mut cache = self.blocks_guard();
        let cached: Option<BlockP> = cache
            .lru
            .get(&blockoffset)
            .cloned();
        if let Some(blockp) = cached {
            cache.hits += 1;
            return Ok(blockp);
        }
        cache.misses += 1;
        let start: ByteOffset = blockoffset * self.blocksz as ByteOffset;
        debug_assert_le!(start, self.log.size(), "block {} starts past the log", blockoffset);
        let len: usize = std::cmp::min(self.blocksz as ByteOffset, self.log.size() - start) as usize;
        let mut block: Block = vec![0; len];
        cache
            .file
            .seek(SeekFrom::Start(start))?;
        cache
            .file
            .read_exact(&mut block)?;
        let blockp: BlockP = BlockP::new(block);
        cache
            .lru
            .put(blockoffset, blockp.clone());
        Ok(blockp)
    }

    fn byte_at(
        &self,
        offset: ByteOffset,
    ) -> NavResult<u8> {
        let blocksz = self.blocksz as ByteOffset;
        let blockp = self.read_block(offset / blocksz)?;
        Ok(blockp[(offset % blocksz) as usize])
    }

    /// Offset of the first newline at or after `from`, within the snapshot.
    fn find_nl(
        &self,
        from: ByteOffset,
    ) -> NavResult<Option<ByteOffset>> {
        let size = self.log.size();
        if from >= size {
            return Ok(None);
        }
        let blocksz = self.blocksz as ByteOffset;
        let mut blockoffset: BlockOffset = from / blocksz;
        let blockoffset_last: BlockOffset = (size - 1) / blocksz;
        let mut blockindex: usize = (from % blocksz) as usize;
        while blockoffset <= blockoffset_last {
            let blockp = self.read_block(blockoffset)?;
            if let Some(at) = memchr(NLu8, &blockp[blockindex..]) {
                return Ok(Some(blockoffset * blocksz + (blockindex + at) as ByteOffset));
            }
            blockindex = 0;
            blockoffset += 1;
        }
        Ok(None)
    }

    /// Offset of the last newline strictly before `below`.
    fn rfind_nl(
        &self,
        below: ByteOffset,
    ) -> NavResult<Option<ByteOffset>> {
        let below = below.min(self.log.size());
        if below == 0 {
            return Ok(None);
        }
        let blocksz = self.blocksz as ByteOffset;
        let mut blockoffset: BlockOffset = (below - 1) / blocksz;
        loop {
            let blockp = self.read_block(blockoffset)?;
            let end: usize = std::cmp::min(blockp.len() as ByteOffset, below - blockoffset * blocksz) as usize;
            if let Some(at) = memrchr(NLu8, &blockp[..end]) {
                return Ok(Some(blockoffset * blocksz + at as ByteOffset));
            }
            if blockoffset == 0 {
                break;
            }
            blockoffset -= 1;
        }
        Ok(None)
    }

    /// Nearest entry boundary at or after `offset`.
    fn snap_forward(
        &self,
        offset: ByteOffset,
    ) -> NavResult<ByteOffset> {
        let size = self.log.size();
        if offset == 0 || offset >= size {
            return Ok(offset.min(size));
        }
        if self.byte_at(offset - 1)? == NLu8 {
            // already at a boundary
            return Ok(offset);
        }
        match self.find_nl(offset)? {
            Some(nl) => Ok(nl + 1),
            None => Ok(size),
        }
    }

    /// Greatest entry start at or before `offset`.
    fn snap_back(
        &self,
        offset: ByteOffset,
    ) -> NavResult<ByteOffset> {
        let offset = offset.min(self.log.size());
        if offset == 0 {
            return Ok(0);
        }
        match self.rfind_nl(offset)? {
            Some(nl) => Ok(nl + 1),
            None => Ok(0),
        }
    }

    /// Entry start following the entry that begins at boundary `start`.
    fn next_start(
        &self,
        start: ByteOffset,
    ) -> NavResult<ByteOffset> {
        match self.find_nl(start)? {
            Some(nl) => Ok(nl + 1),
            None => Ok(self.log.size()),
        }
    }

    /// Entry start preceding boundary `start`.
    fn prev_start(
        &self,
        start: ByteOffset,
    ) -> NavResult<ByteOffset> {
        self.snap_back(start.saturating_sub(1))
    }
}

impl LogRawAccess for LineLogAccess {
    fn log(&self) -> &Log {
        &self.log
    }

    fn relative(
        &self,
        cursor: Option<&LogCursor>,
        delta_entries: i64,
    ) -> NavResult<LogCursor> {
        defn!("({:?}, {})", cursor.map(LogCursor::offset), delta_entries);
        let size = self.log.size();
        let base: ByteOffset = match cursor {
            Some(c) => c.offset().min(size),
            None => 0,
        };
        let offset: ByteOffset = if delta_entries == 0 {
            self.snap_forward(base)?
        } else if delta_entries > 0 {
            let mut fo = self.snap_back(base)?;
            let mut remain = delta_entries;
            while remain > 0 && fo < size {
                fo = self.next_start(fo)?;
                remain -= 1;
            }
            fo
        } else {
            let mut fo = self.snap_back(base)?;
            let mut remain = delta_entries.unsigned_abs();
            while remain > 0 && fo > 0 {
                fo = self.prev_start(fo)?;
                remain -= 1;
            }
            fo
        };
        let cursor_new = LogCursor::at(offset, &self.log);
        defx!("return {}", cursor_new);
        Ok(cursor_new)
    }

    fn read_at(
        &self,
        offset: ByteOffset,
        buf: &mut [u8],
    ) -> NavResult<usize> {
        let size = self.log.size();
        if offset >= size || buf.is_empty() {
            return Ok(0);
        }
        let blocksz = self.blocksz as ByteOffset;
        let end: ByteOffset = (offset + buf.len() as ByteOffset).min(size);
        let mut copied: usize = 0;
        let mut fo: ByteOffset = offset;
        while fo < end {
            let blockp = self.read_block(fo / blocksz)?;
            let blockindex: usize = (fo % blocksz) as usize;
            let take: usize = std::cmp::min(blockp.len() - blockindex, (end - fo) as usize);
            buf[copied..copied + take].copy_from_slice(&blockp[blockindex..blockindex + take]);
            copied += take;
            fo += take as ByteOffset;
        }
        Ok(copied)
    }
}
