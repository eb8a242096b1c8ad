//! Persistence adapters
//!
//! The editor never owns storage. It reads positions and lineage rows through
//! a `LineageStore` and hands back flat row batches on save. Two adapters ship
//! here: `MemoryStore` for embedding and tests, and `FileStore`, which keeps
//! the tables as JSON files on disk.

mod file;
mod memory;
mod table;

pub use file::{FileStore, FileStoreLock};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{LineageRow, LineageUpdateRow, NewLineageRow, Position};
use async_trait::async_trait;

/// Backend the lineage editor reads from and writes to
#[async_trait]
pub trait LineageStore: Send + Sync {
    /// All assignable positions for the tenant
    async fn fetch_positions(&self) -> Result<Vec<Position>>;

    /// Every stored lineage row, across all lineages
    async fn fetch_lineages(&self) -> Result<Vec<LineageRow>>;

    /// Insert the rows of a new lineage
    ///
    /// Fails with `LineageExists` when rows already carry the name.
    async fn create_lineage(&self, rows: &[NewLineageRow]) -> Result<()>;

    /// Replace all rows sharing the payload's name with the payload
    async fn update_lineage(&self, rows: &[LineageUpdateRow]) -> Result<()>;

    /// Delete every row sharing `name`
    async fn delete_lineage(&self, name: &str) -> Result<()>;
}
