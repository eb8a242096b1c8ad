//! Lineage operation processor
//!
//! Runs an operation, then appends its log entry (if any) to the context's
//! activity log with the configured actor attached. A failed append is
//! logged and does not turn a completed mutation into an error.

use crate::config::OrgopsConfig;
use crate::context::LineageContext;
use crate::error::{LineageError, Result};
use async_trait::async_trait;
use orgops_operations::{Execute, LogEntry, OperationProcessor};
use serde_json::Value;
use tracing::{debug, warn};

/// Processor for lineage operations
#[derive(Debug, Clone, Default)]
pub struct LineageOperationProcessor {
    actor: Option<String>,
}

impl LineageOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every logged operation to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// Processor attributing operations to the configured actor, if any
    pub fn from_config(config: &OrgopsConfig) -> Self {
        Self {
            actor: config.actor.clone(),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[async_trait]
impl OperationProcessor<LineageContext, LineageError> for LineageOperationProcessor {
    async fn process<T>(&self, operation: &T, ctx: &LineageContext) -> Result<Value>
    where
        T: Execute<LineageContext, LineageError> + Send + Sync,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();
        let value = result?;

        if let Some(entry) = log_entry {
            let entry = match &self.actor {
                Some(actor) => entry.with_actor(actor.as_str()),
                None => entry,
            };
            let affected = operation.affected_resource_ids(&value);
            if let Err(e) = self.write_log(ctx, &entry, &affected).await {
                warn!(op = %entry.op, error = %e, "failed to record activity");
            }
        }

        Ok(value)
    }

    async fn write_log(
        &self,
        ctx: &LineageContext,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<()> {
        debug!(
            op = %log_entry.op,
            affected = ?affected_resources,
            "recording activity"
        );
        ctx.append_activity(log_entry).await
    }
}
