//! Audit storage backends.
//!
//! Every backend assigns ids in save order and keeps timestamps
//! non-decreasing, so "newest first" is simply reverse save order.

use crate::entry::AuditEntry;
use crate::error::AuditError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::config::audit::{AuditConfig, StorageBackend};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// Persistence port for audit entries.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Persist an entry, assigning its id, and return the stored entry.
    async fn save(&self, entry: AuditEntry) -> Result<AuditEntry, AuditError>;

    /// Return at most `limit` entries, newest first.
    async fn find_recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError>;

    /// Return all entries for one entity, newest first.
    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Create a storage backend based on configuration.
pub fn create_storage(config: &AuditConfig) -> Result<Arc<dyn AuditStorage>, AuditError> {
    if !config.enabled {
        return Ok(Arc::new(NullStorage));
    }

    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::File => Ok(Arc::new(FileStorage::open(&config.storage.file_path)?)),
        StorageBackend::None => Ok(Arc::new(NullStorage)),
    }
}

/// Append-only, in-memory entry log shared by the concrete backends.
#[derive(Debug, Default)]
struct EntryLog {
    entries: Vec<AuditEntry>,
    next_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl EntryLog {
    fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Rebuild the log from previously persisted entries.
    fn from_entries(mut entries: Vec<AuditEntry>) -> Self {
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        let next_id = entries.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
        let last_timestamp = entries.last().map(|e| e.timestamp);
        Self {
            entries,
            next_id,
            last_timestamp,
        }
    }

    /// Assign the next id and clamp the timestamp without storing the entry.
    fn stamp(&self, mut entry: AuditEntry) -> AuditEntry {
        if entry.id.is_none() {
            entry.id = Some(self.next_id);
        }
        if let Some(last) = self.last_timestamp {
            if entry.timestamp < last {
                entry.timestamp = last;
            }
        }
        entry
    }

    fn push(&mut self, entry: AuditEntry) {
        if let Some(id) = entry.id {
            self.next_id = self.next_id.max(id + 1);
        }
        self.last_timestamp = Some(entry.timestamp);
        self.entries.push(entry);
    }

    fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    fn by_entity(&self, entity_type: &str, entity_id: i64) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.entity_type == entity_type && e.entity_id == Some(entity_id))
            .cloned()
            .collect()
    }
}

/// In-memory storage. Entries live for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryStorage {
    log: RwLock<EntryLog>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            log: RwLock::new(EntryLog::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStorage for MemoryStorage {
    async fn save(&self, entry: AuditEntry) -> Result<AuditEntry, AuditError> {
        let mut log = self.log.write().map_err(|_| AuditError::LockPoisoned)?;
        let entry = log.stamp(entry);
        log.push(entry.clone());
        Ok(entry)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let log = self.log.read().map_err(|_| AuditError::LockPoisoned)?;
        Ok(log.recent(limit))
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let log = self.log.read().map_err(|_| AuditError::LockPoisoned)?;
        Ok(log.by_entity(entity_type, entity_id))
    }
}

/// File storage: appends JSON Lines to a log file and serves queries from an
/// in-memory copy that is rebuilt from the file on open.
pub struct FileStorage {
    path: PathBuf,
    // Writers hold the lock across the file append so file order matches id order.
    log: Mutex<EntryLog>,
}

impl FileStorage {
    /// Open (or create) the log file at `path` and load existing entries.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = Self::load_from_file(&path)?;
        tracing::info!(
            path = %path.display(),
            entries = entries.len(),
            "Loaded audit log"
        );

        Ok(Self {
            path,
            log: Mutex::new(EntryLog::from_entries(entries)),
        })
    }

    /// Load entries from a JSON Lines file, skipping unreadable lines.
    fn load_from_file(path: &Path) -> Result<Vec<AuditEntry>, AuditError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse audit entry on line {} of {}: {}",
                        line_num + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(entries)
    }
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn save(&self, entry: AuditEntry) -> Result<AuditEntry, AuditError> {
        let mut log = self.log.lock().map_err(|_| AuditError::LockPoisoned)?;
        let entry = log.stamp(entry);
        let json = serde_json::to_string(&entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", json)?;

        log.push(entry.clone());
        Ok(entry)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let log = self.log.lock().map_err(|_| AuditError::LockPoisoned)?;
        Ok(log.recent(limit))
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let log = self.log.lock().map_err(|_| AuditError::LockPoisoned)?;
        Ok(log.by_entity(entity_type, entity_id))
    }
}

/// Storage that discards everything (auditing disabled).
#[derive(Debug, Default)]
pub struct NullStorage;

#[async_trait]
impl AuditStorage for NullStorage {
    async fn save(&self, entry: AuditEntry) -> Result<AuditEntry, AuditError> {
        Ok(entry)
    }

    async fn find_recent(&self, _limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(vec![])
    }

    async fn find_by_entity(
        &self,
        _entity_type: &str,
        _entity_id: i64,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(vec![])
    }
}
