//! In-memory adapter

use super::table::LineageTable;
use super::LineageStore;
use crate::error::Result;
use crate::types::{CompanyId, LineageRow, LineageUpdateRow, NewLineageRow, Position};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Tables held in process memory, scoped to one tenant
#[derive(Debug, Default)]
pub struct MemoryStore {
    company_id: CompanyId,
    positions: RwLock<Vec<Position>>,
    lineages: RwLock<LineageTable>,
}

impl MemoryStore {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            ..Self::default()
        }
    }

    pub fn with_positions(mut self, positions: Vec<Position>) -> Self {
        self.positions = RwLock::new(positions);
        self
    }

    pub fn with_rows(mut self, rows: Vec<LineageRow>) -> Self {
        self.lineages = RwLock::new(LineageTable::new(rows));
        self
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub async fn add_position(&self, position: Position) {
        self.positions.write().await.push(position);
    }
}

#[async_trait]
impl LineageStore for MemoryStore {
    async fn fetch_positions(&self) -> Result<Vec<Position>> {
        Ok(self.positions.read().await.clone())
    }

    async fn fetch_lineages(&self) -> Result<Vec<LineageRow>> {
        Ok(self.lineages.read().await.rows().to_vec())
    }

    async fn create_lineage(&self, rows: &[NewLineageRow]) -> Result<()> {
        self.lineages.write().await.create(rows, self.company_id)?;
        debug!(rows = rows.len(), "created lineage rows in memory");
        Ok(())
    }

    async fn update_lineage(&self, rows: &[LineageUpdateRow]) -> Result<()> {
        self.lineages.write().await.replace(rows);
        debug!(rows = rows.len(), "replaced lineage rows in memory");
        Ok(())
    }

    async fn delete_lineage(&self, name: &str) -> Result<()> {
        let removed = self.lineages.write().await.delete(name)?;
        debug!(lineage = name, removed, "deleted lineage rows in memory");
        Ok(())
    }
}
