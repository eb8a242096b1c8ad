//! UpdateLineage command

use super::{apply_positions, logged};
use crate::context::LineageContext;
use crate::editor::HierarchyEditor;
use crate::error::{LineageError, Result};
use crate::types::PositionId;
use orgops_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Rename a lineage and/or replace its positions
///
/// Omitted fields keep their stored value. An update that changes nothing is
/// rejected the same way the editor disables its save button.
#[operation(
    verb = "update",
    noun = "lineage",
    description = "Rename a lineage or replace its ordered positions"
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLineage {
    /// The current lineage name
    pub name: String,
    /// New name for the lineage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Replacement positions from the top of the chain down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_ids: Option<Vec<PositionId>>,
}

impl UpdateLineage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            new_name: None,
            position_ids: None,
        }
    }

    pub fn with_new_name(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    pub fn with_positions(mut self, position_ids: Vec<PositionId>) -> Self {
        self.position_ids = Some(position_ids);
        self
    }

    async fn run(&self, ctx: &LineageContext) -> Result<Value> {
        let positions = ctx.store().fetch_positions().await?;
        let rows = ctx.store().fetch_lineages().await?;
        let mut editor =
            HierarchyEditor::hydrate(self.name.as_str(), positions, &rows, ctx.company_id())?;

        if let Some(new_name) = &self.new_name {
            editor.set_name(new_name.as_str());
        }
        if let Some(position_ids) = &self.position_ids {
            apply_positions(&mut editor, position_ids)?;
        }

        let lineage = editor.save(ctx.store()).await?;
        Ok(serde_json::to_value(&lineage)?)
    }
}

#[async_trait]
impl Execute<LineageContext, LineageError> for UpdateLineage {
    async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
        let started = Instant::now();
        logged(self, started, self.run(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        let mut ids = vec![self.name.clone()];
        ids.extend(self.new_name.iter().cloned());
        ids
    }
}
