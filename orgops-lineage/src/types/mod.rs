//! Core types for lineage editing

mod ids;
mod level;
mod lineage;
mod position;

pub use ids::{CompanyId, PositionId};
pub use level::HierarchyLevel;
pub use lineage::{group_lineages, Lineage, LineageRow, LineageUpdateRow, NewLineageRow};
pub use position::Position;
