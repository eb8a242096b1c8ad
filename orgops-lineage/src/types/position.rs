//! Assignable organizational positions

use super::ids::PositionId;
use serde::{Deserialize, Serialize};

/// A role slot that can be placed at one level of a lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
}

impl Position {
    pub fn new(id: impl Into<PositionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
