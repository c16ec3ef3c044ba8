//! Write-Ahead Log Module
//!
//! Append-only, line-oriented durability log. Every append is written and
//! synced before it returns; recovery is a single sequential scan.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::{CacheError, Result};
use crate::wal::WalRecord;

/// Chunk size used when scanning backwards for the last complete line.
const TAIL_SCAN_CHUNK: u64 = 4096;

// == Write-Ahead Log ==
/// Durable, ordered record of every accepted write.
#[derive(Debug)]
pub struct WriteAheadLog {
    /// Location of the log file
    path: PathBuf,
    /// Append handle, `None` once closed
    file: Option<File>,
    /// Length of the file covered by successful appends
    committed_len: u64,
}

impl WriteAheadLog {
    // == Open ==
    /// Opens the log at `path`, creating it and its parent directory if absent.
    ///
    /// A partial trailing line left by a crash mid-append is truncated so the
    /// next record starts on its own line.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(CacheError::io(parent))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(CacheError::io(&path))?;

        let len = file.metadata().map_err(CacheError::io(&path))?.len();
        let valid_len = complete_prefix_len(&mut file, len).map_err(CacheError::io(&path))?;
        if valid_len < len {
            warn!(
                "Truncating {} torn bytes at the end of {}",
                len - valid_len,
                path.display()
            );
            file.set_len(valid_len).map_err(CacheError::io(&path))?;
            file.sync_data().map_err(CacheError::io(&path))?;
        }

        debug!("Opened write-ahead log at {} ({} bytes)", path.display(), valid_len);

        Ok(Self {
            path,
            file: Some(file),
            committed_len: valid_len,
        })
    }

    // == Append ==
    /// Appends one record and syncs it to stable storage before returning.
    ///
    /// On failure the file is cut back to its length before the call, so no
    /// fragment of the rejected record can reach a later append or a replay.
    pub fn append(&mut self, record: &WalRecord) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(CacheError::LogClosed(self.path.clone()));
        };

        let line = record.encode();
        let written = file
            .write_all(line.as_bytes())
            .and_then(|()| file.sync_data());

        if let Err(source) = written {
            self.discard_uncommitted();
            return Err(CacheError::Io {
                path: self.path.clone(),
                source,
            });
        }

        self.committed_len += line.len() as u64;
        Ok(())
    }

    /// Truncates whatever a failed append left past the committed length.
    ///
    /// If that is impossible the log closes itself; the next `open` drops the
    /// unterminated tail.
    fn discard_uncommitted(&mut self) {
        let Some(file) = self.file.as_ref() else {
            return;
        };

        if let Err(e) = file
            .set_len(self.committed_len)
            .and_then(|()| file.sync_data())
        {
            error!(
                "Cannot roll back failed append in {}, closing log: {}",
                self.path.display(),
                e
            );
            self.file = None;
        }
    }

    // == Read All ==
    /// Reads every record from the start of the log, in append order.
    ///
    /// Undecodable lines are skipped rather than failing the whole read.
    pub fn read_all(&self) -> Result<Vec<WalRecord>> {
        let file = File::open(&self.path).map_err(CacheError::io(&self.path))?;
        let mut reader = BufReader::new(file);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut line = Vec::new();
        let mut line_no = 0usize;

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(CacheError::io(&self.path))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            // Unterminated fragment: the append never completed
            if line.pop() != Some(b'\n') {
                warn!("Skipping unterminated line {} in {}", line_no, self.path.display());
                skipped += 1;
                continue;
            }

            match std::str::from_utf8(&line).ok().and_then(WalRecord::decode) {
                Some(record) => records.push(record),
                None => {
                    warn!("Skipping malformed line {} in {}", line_no, self.path.display());
                    skipped += 1;
                }
            }
        }

        debug!(
            "Read {} records from {} ({} skipped)",
            records.len(),
            self.path.display(),
            skipped
        );

        Ok(records)
    }

    // == Close ==
    /// Syncs and releases the file.
    ///
    /// Closing an already closed log does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(CacheError::io(&self.path))?;
        }
        Ok(())
    }

    // == Accessors ==
    /// Returns the location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

/// Returns the length of the file up to and including its last newline.
fn complete_prefix_len(file: &mut File, len: u64) -> std::io::Result<u64> {
    let mut end = len;
    let mut buf = vec![0u8; TAIL_SCAN_CHUNK as usize];

    while end > 0 {
        let start = end.saturating_sub(TAIL_SCAN_CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;

        if let Some(pos) = chunk.iter().rposition(|&b| b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }

    Ok(0)
}
