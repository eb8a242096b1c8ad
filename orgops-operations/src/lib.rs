//! # orgops operations
//!
//! Operations are plain structs whose fields are their parameters. The
//! `#[operation]` attribute attaches the verb/noun metadata, and an
//! `Execute` impl does the work against a domain context.
//!
//! ## Example
//!
//! ```ignore
//! use orgops_operations::*;
//!
//! #[operation(verb = "delete", noun = "lineage", description = "Delete a lineage")]
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct DeleteLineage {
//!     /// The lineage name
//!     pub name: String,
//! }
//!
//! #[async_trait]
//! impl Execute<LineageContext, LineageError> for DeleteLineage {
//!     async fn execute(&self, ctx: &LineageContext) -> ExecutionResult<Value, LineageError> {
//!         // returns ExecutionResult::Logged for mutations, Unlogged for reads
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use orgops_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
