//! Supervisor lineage editing
//!
//! A lineage is a named chain of positions ordered from the top of an
//! organization down, one position per hierarchical level. This crate holds
//! the editing rules for lineages and the plumbing to persist them.
//!
//! ## Overview
//!
//! - **HierarchyModel** - ordered levels with unique positions and contiguous
//!   level numbers, kept true by every mutation
//! - **HierarchyEditor** - a model plus the name, position pool and save gate
//!   for one create or update session
//! - **LineageSession** - which editor, if any, is open
//! - **LineageStore** - the persistence seam, with in-memory and file-backed
//!   adapters
//! - **Operations** - scripted create/update/delete/get/list commands that
//!   drive a headless editor, logged to a JSONL activity log
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use orgops_lineage::{
//!     lineage::CreateLineage, store::FileStore, CompanyId, LineageContext,
//!     LineageOperationProcessor, OperationProcessor, Position, PositionId,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new("/path/to/.orgops", CompanyId::default());
//! store.init().await?;
//! store.add_position(Position::new(1, "Director")).await?;
//! store.add_position(Position::new(2, "Manager")).await?;
//!
//! let ctx = LineageContext::with_file_store(store);
//! let processor = LineageOperationProcessor::with_actor("hr-admin");
//! let lineage = processor
//!     .process(
//!         &CreateLineage::new("Operations", vec![PositionId::new(1), PositionId::new(2)]),
//!         &ctx,
//!     )
//!     .await?;
//!
//! println!("created {}", lineage["name"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! .orgops/
//! ├── positions.json          # Positions of the tenant
//! ├── lineages.json           # Flat lineage rows (name, position, level, company)
//! ├── .lock                   # Exclusive write lock
//! └── activity/
//!     └── current.jsonl       # Operation log, one JSON object per line
//! ```

pub mod config;
mod context;
pub mod editor;
mod error;
pub mod lineage;
pub mod logging;
pub mod model;
pub mod parse;
pub mod position;
mod processor;
pub mod session;
pub mod store;
pub mod types;

// Re-export Execute trait and types from operations crate
pub use orgops_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::{LogConfig, OrgopsConfig};
pub use context::LineageContext;
pub use editor::{EditorMode, HierarchyEditor, SaveBlocker};
pub use error::{LineageError, Result};
pub use model::HierarchyModel;
pub use parse::{parse_input, LineageRequest};
pub use processor::LineageOperationProcessor;
pub use session::{DeleteOutcome, LineageSession, SubmitOutcome};
pub use store::LineageStore;

pub use types::{
    group_lineages, CompanyId, HierarchyLevel, Lineage, LineageRow, LineageUpdateRow,
    NewLineageRow, Position, PositionId,
};
