//! One rung of a lineage

use super::ids::PositionId;
use serde::{Deserialize, Serialize};

/// A 1-based level paired with the position assigned to it
///
/// `position_id` is `None` only while the level is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyLevel {
    pub level: u32,
    pub position_id: Option<PositionId>,
}

impl HierarchyLevel {
    pub fn new(level: u32, position_id: Option<PositionId>) -> Self {
        Self { level, position_id }
    }

    pub fn assigned(level: u32, position_id: impl Into<PositionId>) -> Self {
        Self::new(level, Some(position_id.into()))
    }

    pub fn unassigned(level: u32) -> Self {
        Self::new(level, None)
    }
}
