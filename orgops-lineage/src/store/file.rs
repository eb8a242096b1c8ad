//! FileStore - lineage tables as JSON files
//!
//! ```text
//! data_dir/
//! ├── positions.json        # Assignable positions
//! ├── lineages.json         # Flat lineage row table
//! ├── .lock                 # Exclusive write lock
//! └── activity/
//!     └── current.jsonl     # Operation log, one JSON object per line
//! ```
//!
//! Writes go through a temp file and rename, and are serialised by a
//! non-blocking `fs2` lock.

use super::table::LineageTable;
use super::LineageStore;
use crate::error::{LineageError, Result};
use crate::logging::Pretty;
use crate::types::{CompanyId, LineageRow, LineageUpdateRow, NewLineageRow, Position};
use async_trait::async_trait;
use fs2::FileExt;
use orgops_operations::LogEntry;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

pub struct FileStore {
    root: PathBuf,
    company_id: CompanyId,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, company_id: CompanyId) -> Self {
        Self {
            root: root.into(),
            company_id,
        }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn positions_path(&self) -> PathBuf {
        self.root.join("positions.json")
    }

    pub fn lineages_path(&self) -> PathBuf {
        self.root.join("lineages.json")
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    pub fn is_initialized(&self) -> bool {
        self.positions_path().exists() && self.lineages_path().exists()
    }

    /// Create the directory layout and empty tables
    ///
    /// Idempotent: existing tables are left alone.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.activity_dir()).await?;

        if !self.positions_path().exists() {
            self.write_positions(&[]).await?;
        }
        if !self.lineages_path().exists() {
            self.write_table(&LineageTable::default()).await?;
        }
        debug!(root = %self.root.display(), "initialized lineage store");
        Ok(())
    }

    // =========================================================================
    // Table I/O
    // =========================================================================

    pub async fn read_positions(&self) -> Result<Vec<Position>> {
        let path = self.positions_path();
        self.require(&path)?;
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn write_positions(&self, positions: &[Position]) -> Result<()> {
        let content = serde_json::to_string_pretty(positions)?;
        atomic_write(&self.positions_path(), content.as_bytes()).await
    }

    /// Append a position to the catalog under the store lock
    pub async fn add_position(&self, position: Position) -> Result<()> {
        let _lock = self.lock().await?;
        let mut positions = self.read_positions().await?;
        positions.push(position);
        self.write_positions(&positions).await
    }

    async fn read_table(&self) -> Result<LineageTable> {
        let path = self.lineages_path();
        self.require(&path)?;
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_table(&self, table: &LineageTable) -> Result<()> {
        let content = serde_json::to_string_pretty(table)?;
        atomic_write(&self.lineages_path(), content.as_bytes()).await
    }

    fn require(&self, path: &Path) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(LineageError::NotInitialized {
                path: self.root.clone(),
            })
        }
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append an entry to the activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        fs::create_dir_all(self.activity_dir()).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.activity_path())
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Activity entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to take the exclusive write lock (non-blocking)
    pub async fn lock(&self) -> Result<FileStoreLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(FileStoreLock { file }),
            Err(_) => Err(LineageError::LockBusy),
        }
    }
}

#[async_trait]
impl LineageStore for FileStore {
    async fn fetch_positions(&self) -> Result<Vec<Position>> {
        self.read_positions().await
    }

    async fn fetch_lineages(&self) -> Result<Vec<LineageRow>> {
        Ok(self.read_table().await?.rows().to_vec())
    }

    async fn create_lineage(&self, rows: &[NewLineageRow]) -> Result<()> {
        let _lock = self.lock().await?;
        let mut table = self.read_table().await?;
        table.create(rows, self.company_id)?;
        self.write_table(&table).await?;
        trace!("wrote created lineage rows: {}", Pretty(rows));
        Ok(())
    }

    async fn update_lineage(&self, rows: &[LineageUpdateRow]) -> Result<()> {
        let _lock = self.lock().await?;
        let mut table = self.read_table().await?;
        table.replace(rows);
        self.write_table(&table).await?;
        trace!("wrote replaced lineage rows: {}", Pretty(rows));
        Ok(())
    }

    async fn delete_lineage(&self, name: &str) -> Result<()> {
        let _lock = self.lock().await?;
        let mut table = self.read_table().await?;
        let removed = table.delete(name)?;
        self.write_table(&table).await?;
        trace!(lineage = name, removed, "wrote lineage deletion");
        Ok(())
    }
}

/// RAII lock guard - releases on drop
pub struct FileStoreLock {
    file: std::fs::File,
}

impl Drop for FileStoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}
