//! LineageContext - what operations run against
//!
//! Bundles the store, the tenant, and (for file-backed stores) where the
//! activity log lives. No business logic lives here.

use crate::config::OrgopsConfig;
use crate::error::Result;
use crate::store::{FileStore, LineageStore};
use crate::types::CompanyId;
use orgops_operations::LogEntry;
use std::sync::Arc;

pub struct LineageContext {
    store: Arc<dyn LineageStore>,
    company_id: CompanyId,
    files: Option<Arc<FileStore>>,
}

impl LineageContext {
    /// Context over any store; operations are not written to an activity log
    pub fn new(store: Arc<dyn LineageStore>, company_id: CompanyId) -> Self {
        Self {
            store,
            company_id,
            files: None,
        }
    }

    /// Context over a file-backed store, with its activity log
    pub fn with_file_store(store: FileStore) -> Self {
        let company_id = store.company_id();
        let files = Arc::new(store);
        Self {
            store: files.clone(),
            company_id,
            files: Some(files),
        }
    }

    /// File-backed context built from configuration, initializing the store
    pub async fn from_config(config: &OrgopsConfig) -> Result<Self> {
        let store = FileStore::new(&config.data_dir, config.company_id);
        store.init().await?;
        Ok(Self::with_file_store(store))
    }

    pub fn store(&self) -> &dyn LineageStore {
        self.store.as_ref()
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn file_store(&self) -> Option<&FileStore> {
        self.files.as_deref()
    }

    /// Append to the activity log; a no-op without a file-backed store
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        match &self.files {
            Some(files) => files.append_activity(entry).await,
            None => Ok(()),
        }
    }

    /// Activity entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        match &self.files {
            Some(files) => files.read_activity(limit).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_context_has_no_activity() {
        let ctx = LineageContext::new(Arc::new(MemoryStore::default()), CompanyId::new(5));
        ctx.append_activity(&LogEntry::new("list lineages", json!({}), json!([]), None, 0))
            .await
            .unwrap();
        assert!(ctx.read_activity(None).await.unwrap().is_empty());
        assert!(ctx.file_store().is_none());
        assert_eq!(ctx.company_id(), CompanyId::new(5));
    }

    #[tokio::test]
    async fn test_from_config_initializes_store() {
        let temp = TempDir::new().unwrap();
        let config = OrgopsConfig {
            data_dir: temp.path().join("data"),
            company_id: CompanyId::new(8),
            ..OrgopsConfig::default()
        };

        let ctx = LineageContext::from_config(&config).await.unwrap();
        let files = ctx.file_store().unwrap();
        assert!(files.is_initialized());
        assert_eq!(ctx.company_id(), CompanyId::new(8));
    }
}
