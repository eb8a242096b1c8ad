//! DeleteLineage command

use super::logged;
use crate::context::LineageContext;
use crate::error::{LineageError, Result};
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

/// Delete every row of a lineage
#[operation(
    verb = "delete",
    noun = "lineage",
    description = "Delete a lineage and all of its levels"
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLineage {
    /// The lineage name
    pub name: String,
}

impl DeleteLineage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        ctx.store().delete_lineage(&self.name).await?;
        Ok(json!({
            "deleted": true,
            "name": self.name,
        }))
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for DeleteLineage {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.name.clone()]
    }
}
