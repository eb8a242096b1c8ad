//! ListLineages command

use crate::context::LineageContext;
use crate::error::{LineageError, Result};
use crate::types::group_lineages;
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List every lineage, grouped from the flat row table
#[operation(
    verb = "list",
    noun = "lineages",
    description = "List all lineages with their levels"
)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLineages;

impl ListLineages {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        let rows = ctx.store().fetch_lineages().await?;
        Ok(serde_json::to_value(group_lineages(&rows))?)
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for ListLineages {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        self.run(ctx).await.into()
    }
}
