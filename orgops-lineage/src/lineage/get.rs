//! GetLineage command

use crate::context::LineageContext;
use crate::error::{LineageError, Result};
use crate::types::{group_lineages, Position};
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Get one lineage with its position names resolved
#[operation(
    verb = "get",
    noun = "lineage",
    description = "Get a lineage's levels with position names"
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLineage {
    /// The lineage name
    pub name: String,
}

impl GetLineage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        let rows = ctx.store().fetch_lineages().await?;
        let lineage = group_lineages(&rows)
            .into_iter()
            .find(|l| l.name == self.name)
            .ok_or_else(|| LineageError::LineageNotFound {
                name: self.name.clone(),
            })?;

        let positions = ctx.store().fetch_positions().await?;
        let names: HashMap<_, _> = positions.iter().map(|p: &Position| (p.id, p.name.as_str())).collect();

        let levels: Vec<Value> = lineage
            .levels
            .iter()
            .map(|l| {
                json!({
                    "level": l.level,
                    "position_id": l.position_id,
                    "position": l.position_id.and_then(|id| names.get(&id).copied()),
                })
            })
            .collect();

        Ok(json!({
            "name": lineage.name,
            "levels": levels,
        }))
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for GetLineage {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        self.run(ctx).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{CompanyId, LineageRow, PositionId};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_lineage_resolves_names() {
        let rows = [(2, 20), (1, 10)]
            .iter()
            .map(|&(level, p)| LineageRow {
                name: "Ops Chain".into(),
                position_id: PositionId::new(p),
                hierarchical_level: level,
                company_id: CompanyId::default(),
            })
            .collect();
        let store = MemoryStore::default()
            .with_positions(vec![Position::new(10, "Director"), Position::new(20, "Manager")])
            .with_rows(rows);
        let ctx = LineageContext::new(Arc::new(store), CompanyId::default());

        let result = GetLineage::new("Ops Chain").execute(&ctx).await;
        assert!(!result.should_log());

        let value = result.into_result().unwrap();
        assert_eq!(value["levels"][0]["position"], "Director");
        assert_eq!(value["levels"][1]["position"], "Manager");
        assert_eq!(value["levels"][1]["level"], 2);
    }

    #[tokio::test]
    async fn test_get_missing_lineage() {
        let ctx = LineageContext::new(Arc::new(MemoryStore::default()), CompanyId::default());
        let err = GetLineage::new("Ghost")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, LineageError::LineageNotFound { .. }));
    }
}
