//! ListPositions command

use crate::context::LineageContext;
use crate::editor::remaining_positions;
use crate::error::{LineageError, Result};
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List the tenant's positions
///
/// With `available_for` set, only positions that lineage may still use are
/// returned: its own plus those no other lineage holds.
#[operation(
    verb = "list",
    noun = "positions",
    description = "List positions, optionally only those available to a lineage"
)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPositions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for: Option<String>,
}

impl ListPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available_for(name: impl Into<String>) -> Self {
        Self {
            available_for: Some(name.into()),
        }
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        let positions = ctx.store().fetch_positions().await?;
        let positions = match &self.available_for {
            Some(name) => {
                let rows = ctx.store().fetch_lineages().await?;
                remaining_positions(name, positions, &rows)
            }
            None => positions,
        };
        Ok(serde_json::to_value(positions)?)
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for ListPositions {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        self.run(ctx).await.into()
    }
}
