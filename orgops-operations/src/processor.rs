//! Operation processor trait
//!
//! A processor runs an operation and decides what to do with its log entry.

use crate::{Execute, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations for a context and persists their log entries
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute an operation, write its log entry when it has one, and return the value
    async fn process<T>(&self, operation: &T, ctx: &C) -> Result<Value, E>
    where
        T: Execute<C, E> + Send + Sync;

    /// Persist a log entry
    async fn write_log(
        &self,
        ctx: &C,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<(), E>;
}
