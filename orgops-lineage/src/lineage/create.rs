//! CreateLineage command

use super::{apply_positions, logged};
use crate::context::LineageContext;
use crate::editor::HierarchyEditor;
use crate::error::{LineageError, Result};
use crate::types::PositionId;
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Create a lineage from an ordered list of positions, top level first
#[operation(
    verb = "create",
    noun = "lineage",
    description = "Create a supervisor lineage from an ordered list of positions"
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLineage {
    /// The lineage name
    pub name: String,
    /// Positions from the top of the chain down
    pub position_ids: Vec<PositionId>,
}

impl CreateLineage {
    pub fn new(name: impl Into<String>, position_ids: Vec<PositionId>) -> Self {
        Self {
            name: name.into(),
            position_ids,
        }
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        let positions = ctx.store().fetch_positions().await?;
        let mut editor = HierarchyEditor::create(positions);
        editor.set_name(self.name.as_str());
        apply_positions(&mut editor, &self.position_ids)?;

        let lineage = editor.save(ctx.store()).await?;
        Ok(serde_json::to_value(&lineage)?)
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for CreateLineage {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.name.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::SaveBlocker;
    use crate::store::MemoryStore;
    use crate::types::{CompanyId, Position};
    use std::sync::Arc;

    fn setup() -> LineageContext {
        let store = MemoryStore::new(CompanyId::new(6)).with_positions(vec![
            Position::new(10, "Director"),
            Position::new(20, "Manager"),
        ]);
        LineageContext::new(Arc::new(store), CompanyId::new(6))
    }

    fn ids(raw: &[i64]) -> Vec<PositionId> {
        raw.iter().copied().map(PositionId::new).collect()
    }

    #[tokio::test]
    async fn test_create_lineage() {
        let ctx = setup();
        let result = CreateLineage::new("Ops Chain", ids(&[20, 10]))
            .execute(&ctx)
            .await;
        assert!(result.should_log());

        let value = result.into_result().unwrap();
        assert_eq!(value["name"], "Ops Chain");
        assert_eq!(value["levels"][0]["position_id"], 20);
        assert_eq!(value["levels"][1]["level"], 2);

        let rows = ctx.store().fetch_lineages().await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_create_with_blank_name() {
        let ctx = setup();
        let err = CreateLineage::new("  ", ids(&[10]))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(
            err,
            LineageError::SaveBlocked(SaveBlocker::EmptyName)
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let ctx = setup();
        CreateLineage::new("Ops Chain", ids(&[10]))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let err = CreateLineage::new("Ops Chain", ids(&[20]))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, LineageError::LineageExists { .. }));
    }
}
