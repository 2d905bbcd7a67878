//! Audit sinks for persisting audit records

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::record::{AuditEntry, AuditRecord, LogQuery};
use crate::error::StorageError;

/// Storage for the audit trail.
///
/// `append` must not return until the record is durable in the store; a
/// failure is reported to the caller, never buffered or retried.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record and return it with its generated id
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry, StorageError>;

    /// Read back entries matching the query, newest first
    async fn query(&self, query: &LogQuery) -> Result<Vec<AuditEntry>, StorageError>;
}

// == Memory Sink ==
/// In-memory audit sink.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry, StorageError> {
        let mut entries = self.entries.write();
        let entry = AuditEntry::new(entries.len() as u64 + 1, record);
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<AuditEntry>, StorageError> {
        Ok(query.apply(self.entries.read().iter()))
    }
}

// == File Sink ==
/// Append-only JSON Lines audit sink.
///
/// Each append opens the file, writes one line, flushes and closes it again.
/// Reads and appends are serialized through `next_id`, so ids follow file
/// order and a reader never sees a line that is still being written.
///
/// A line is only committed once its trailing newline is on disk. An
/// unterminated last line left by a failed write is ignored by readers and cut
/// off before the next append.
#[derive(Debug)]
pub struct FileAuditSink {
    path: PathBuf,
    next_id: Mutex<u64>,
}

impl FileAuditSink {
    /// Opens (or prepares) the log at `path`, resuming ids after the last entry.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let last_id = if path.is_file() {
            read_entries(&path)
                .await?
                .iter()
                .map(|e| e.id)
                .max()
                .unwrap_or(0)
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            0
        };

        info!(path = %path.display(), last_id, "File audit sink ready");
        Ok(Self {
            path,
            next_id: Mutex::new(last_id + 1),
        })
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry, StorageError> {
        let mut next_id = self.next_id.lock().await;
        let entry = AuditEntry::new(*next_id, record);
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        {
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&self.path)
                .await?;
            trim_torn_tail(&mut file, &self.path).await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        *next_id += 1;
        debug!(id = entry.id, "audit entry appended");
        Ok(entry)
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<AuditEntry>, StorageError> {
        let _writer = self.next_id.lock().await;
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let entries = read_entries(&self.path).await?;
        Ok(query.apply(entries.iter()))
    }
}

/// Cuts an unterminated last line back to the previous newline.
async fn trim_torn_tail(file: &mut File, path: &Path) -> Result<(), StorageError> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1)).await?;
    file.read_exact(&mut last).await?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let mut contents = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0)).await?;
    file.read_to_end(&mut contents).await?;
    let keep = contents
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i as u64 + 1);

    warn!(
        path = %path.display(),
        dropped_bytes = len - keep,
        "truncating incomplete audit line"
    );
    file.set_len(keep).await?;
    Ok(())
}

/// Reads every committed line; an unterminated last line is skipped.
async fn read_entries(path: &Path) -> Result<Vec<AuditEntry>, StorageError> {
    let contents = tokio::fs::read(path).await?;
    let mut lines: Vec<&[u8]> = contents.split(|b| *b == b'\n').collect();

    if let Some(tail) = lines.pop() {
        if !tail.is_empty() {
            warn!(path = %path.display(), "ignoring incomplete audit line");
        }
    }

    let mut entries = Vec::with_capacity(lines.len());
    for line in lines {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        entries.push(serde_json::from_slice(line)?);
    }

    Ok(entries)
}
