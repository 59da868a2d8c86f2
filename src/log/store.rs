//! Log Store
//!
//! A single append-only persisted sequence of records.
//!
//! ## Responsibilities
//! - Append length-prefixed records and make them durable before returning
//! - Serve positional reads by offset via the in-memory index
//! - Rebuild the index by scanning the backing file on open
//! - Fail open on a torn trailing write instead of silently dropping data
//!
//! ## Concurrency Model
//! One mutex per store guards the index and both file handles. Appends are
//! totally ordered by the lock; the offset assigned to record *i* is durable
//! before *i+1* is assigned. Reads flush pending buffered writes first, so a
//! read always observes every append that returned before it started.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::SyncPolicy;
use crate::error::{FerroError, Result};

use super::Record;

/// Size of the big-endian length prefix preceding every record payload
pub const LEN_PREFIX_SIZE: u64 = 8;

/// An append-only log of records backed by a single file.
///
/// The file is the sole durable state. The offset index is a derived cache,
/// rebuilt deterministically from the file contents alone at open.
pub struct Store {
    /// Path of the backing file (for logging and diagnostics)
    path: PathBuf,

    /// Append durability policy
    sync_policy: SyncPolicy,

    /// Index, size, and file handles; all mutation serialized here
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    /// File handles; `None` once the store has been closed
    handles: Option<Handles>,

    /// Byte position of the start of each record, indexed by offset.
    /// `index.len()` is the store size and the next offset to assign.
    index: Vec<u64>,
}

struct Handles {
    /// Buffered write handle, opened in append mode so every physical write
    /// lands at the end of the file regardless of cursor position
    writer: BufWriter<File>,

    /// Separate read handle for positional reads, bypassing the write buffer
    reader: File,
}

impl Store {
    /// Open or create a log store backed by the file at `path`.
    ///
    /// Runs the full recovery scan before any append or read is accepted.
    /// Fails with [`FerroError::Corruption`] if the file ends in a torn
    /// write from a previous crash.
    pub fn open(path: impl AsRef<Path>, sync_policy: SyncPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Step 1: Open the write handle (creating the file if absent)
        let write_file = OpenOptions::new().create(true).append(true).open(&path)?;

        // Step 2: Open an independent read handle on the same file
        let mut read_file = OpenOptions::new().read(true).open(&path)?;

        // Step 3: Rebuild the offset index from the durable file contents
        let index = scan_index(&mut read_file, &path)?;

        tracing::debug!(
            path = %path.display(),
            records = index.len(),
            "opened log store"
        );

        Ok(Self {
            path,
            sync_policy,
            inner: Mutex::new(StoreInner {
                handles: Some(Handles {
                    writer: BufWriter::new(write_file),
                    reader: read_file,
                }),
                index,
            }),
        })
    }

    /// Append a record payload and return its assigned offset.
    ///
    /// The record is pushed toward stable storage per the store's
    /// [`SyncPolicy`] before the offset is returned; on-disk growth is
    /// exactly `8 + value.len()` bytes.
    pub fn append(&self, value: &[u8]) -> Result<u64> {
        let mut inner = self.inner.lock();
        let StoreInner { handles, index } = &mut *inner;
        let h = handles.as_mut().ok_or(FerroError::StoreClosed)?;

        // Step 1: Flush pending buffered writes so the durable file length
        // is the start position of this record. Position comes from the
        // file, never from summing index entries.
        h.writer.flush()?;
        let pos = h.writer.get_ref().metadata()?.len();

        // Step 2: Write the length prefix, then the payload
        h.writer.write_all(&(value.len() as u64).to_be_bytes())?;
        h.writer.write_all(value)?;

        // Step 3: Make the record durable before handing out its offset
        h.writer.flush()?;
        if self.sync_policy == SyncPolicy::EveryAppend {
            h.writer.get_ref().sync_data()?;
        }

        // Step 4: Extend the index; the assigned offset is the prior size
        let offset = index.len() as u64;
        index.push(pos);

        Ok(offset)
    }

    /// Read the record stored at `offset`.
    ///
    /// Fails with [`FerroError::OffsetNotFound`] when `offset >= size`,
    /// including on an empty store.
    pub fn read(&self, offset: u64) -> Result<Record> {
        let mut inner = self.inner.lock();
        let StoreInner { handles, index } = &mut *inner;

        // Step 1: Translate offset → byte position
        let pos = match index.get(offset as usize) {
            Some(&pos) => pos,
            None => return Err(FerroError::OffsetNotFound),
        };

        let h = handles.as_mut().ok_or(FerroError::StoreClosed)?;

        // Step 2: Flush pending writes so the positional read below sees
        // every append that has already returned (read-your-writes)
        h.writer.flush()?;

        // Step 3: Positional read of prefix + payload, bypassing the buffer
        let mut len_buf = [0u8; LEN_PREFIX_SIZE as usize];
        h.reader.seek(SeekFrom::Start(pos))?;
        h.reader.read_exact(&mut len_buf)?;
        let len = u64::from_be_bytes(len_buf);

        let mut value = vec![0u8; len as usize];
        h.reader.read_exact(&mut value)?;

        Ok(Record { value, offset })
    }

    /// Flush pending writes and release the file handles.
    ///
    /// Append/read after close fail with [`FerroError::StoreClosed`].
    /// Calling close on an already-closed store is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(mut h) = inner.handles.take() {
            h.writer.flush()?;
            if self.sync_policy == SyncPolicy::EveryAppend {
                h.writer.get_ref().sync_data()?;
            }
            tracing::debug!(path = %self.path.display(), "closed log store");
        }
        Ok(())
    }

    /// Number of records in the store == next offset to be assigned
    pub fn size(&self) -> u64 {
        self.inner.lock().index.len() as u64
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.inner.lock().index.is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Rebuild the offset index by scanning the file from byte 0.
///
/// Walks length prefixes without reading payloads into memory. A short
/// trailing prefix, or a prefix claiming more payload bytes than remain in
/// the file, is a torn write from a previous crash and fails the scan
/// rather than silently truncating the file.
fn scan_index(file: &mut File, path: &Path) -> Result<Vec<u64>> {
    let file_len = file.metadata()?.len();
    let mut index = Vec::new();
    let mut pos = 0u64;
    let mut len_buf = [0u8; LEN_PREFIX_SIZE as usize];

    file.seek(SeekFrom::Start(0))?;

    while pos < file_len {
        // A record must start with a complete 8-byte prefix
        if file_len - pos < LEN_PREFIX_SIZE {
            return Err(FerroError::Corruption(format!(
                "{}: short length prefix at byte {} ({} trailing bytes)",
                path.display(),
                pos,
                file_len - pos
            )));
        }

        file.read_exact(&mut len_buf)?;
        let len = u64::from_be_bytes(len_buf);

        // checked_add: a garbage prefix can claim absurd lengths
        let next = pos
            .checked_add(LEN_PREFIX_SIZE)
            .and_then(|p| p.checked_add(len));
        let next = match next {
            Some(next) if next <= file_len => next,
            _ => {
                return Err(FerroError::Corruption(format!(
                    "{}: record at byte {} claims {} payload bytes, {} remain",
                    path.display(),
                    pos,
                    len,
                    file_len - pos - LEN_PREFIX_SIZE
                )));
            }
        };

        // Record is fully present: index it and skip over the payload
        index.push(pos);
        pos = next;
        file.seek(SeekFrom::Start(pos))?;
    }

    Ok(index)
}
