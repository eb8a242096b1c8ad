//! HierarchyEditor - one editing session over a lineage
//!
//! The editor owns a `HierarchyModel`, the lineage name being typed, and the
//! pool of positions the user may pick from. It answers the questions the form
//! asks (which positions fit this level, can a level be added or removed, is
//! save allowed) and turns the model into payload rows when saving.
//!
//! Two modes:
//!
//! - **create** starts empty; the pool is every position of the tenant.
//! - **update** starts hydrated from stored rows; the pool drops positions
//!   owned by other lineages, and save stays blocked until something changed.

use crate::error::{LineageError, Result};
use crate::model::HierarchyModel;
use crate::store::LineageStore;
use crate::types::{CompanyId, HierarchyLevel, Lineage, LineageRow, Position, PositionId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Why save is unavailable, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SaveBlocker {
    NoLevels,
    EmptyName,
    UnassignedLevel { level: u32 },
    Unchanged,
}

impl fmt::Display for SaveBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLevels => write!(f, "lineage has no levels"),
            Self::EmptyName => write!(f, "lineage name is empty"),
            Self::UnassignedLevel { level } => write!(f, "level {} has no position", level),
            Self::Unchanged => write!(f, "nothing changed"),
        }
    }
}

/// The state an update session started from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageSnapshot {
    pub name: String,
    pub levels: Vec<HierarchyLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Update {
        original: LineageSnapshot,
        company_id: CompanyId,
        /// Names of every other lineage seen when the session opened
        other_names: HashSet<String>,
    },
}

#[derive(Debug, Clone)]
pub struct HierarchyEditor {
    mode: EditorMode,
    name: String,
    model: HierarchyModel,
    pool: Vec<Position>,
}

impl HierarchyEditor {
    /// Empty editor offering every position
    pub fn create(positions: Vec<Position>) -> Self {
        Self {
            mode: EditorMode::Create,
            name: String::new(),
            model: HierarchyModel::new(),
            pool: positions,
        }
    }

    /// Editor hydrated from the stored rows of `name`
    ///
    /// `rows` is the full lineage table; rows of other lineages shrink the pool.
    pub fn hydrate(
        name: impl Into<String>,
        positions: Vec<Position>,
        rows: &[LineageRow],
        company_id: CompanyId,
    ) -> Result<Self> {
        let name = name.into();
        let model = HierarchyModel::hydrate(&name, rows);
        if model.is_empty() {
            return Err(LineageError::LineageNotFound { name });
        }

        let pool = remaining_positions(&name, positions, rows);
        let other_names = rows
            .iter()
            .filter(|r| r.name != name)
            .map(|r| r.name.clone())
            .collect();

        debug!(
            lineage = %name,
            levels = model.len(),
            pool = pool.len(),
            "hydrated lineage editor"
        );

        Ok(Self {
            mode: EditorMode::Update {
                original: LineageSnapshot {
                    name: name.clone(),
                    levels: model.levels().to_vec(),
                },
                company_id,
                other_names,
            },
            name,
            model,
            pool,
        })
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_update(&self) -> bool {
        matches!(self.mode, EditorMode::Update { .. })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name as typed; surrounding whitespace is dropped on save
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn model(&self) -> &HierarchyModel {
        &self.model
    }

    pub fn levels(&self) -> &[HierarchyLevel] {
        self.model.levels()
    }

    /// Positions the user may pick from in this session
    pub fn pool(&self) -> &[Position] {
        &self.pool
    }

    /// Options for the level at `index`
    pub fn available_positions(&self, index: usize) -> Vec<&Position> {
        self.model.available_positions(index, &self.pool)
    }

    /// Put a position on a level; the position leaves any other level
    pub fn assign(&mut self, index: usize, position_id: PositionId) -> Result<()> {
        if !self.pool.iter().any(|p| p.id == position_id) {
            return Err(LineageError::PositionNotFound {
                id: position_id.get(),
            });
        }
        self.model.assign(index, position_id)
    }

    /// Clear the position on a level, keeping the level
    pub fn unassign(&mut self, index: usize) -> Result<()> {
        self.model.unassign(index)
    }

    pub fn can_add_level(&self) -> bool {
        !self.model.unused_positions(&self.pool).is_empty()
    }

    /// Append a level with the first free position; `false` when none is free
    pub fn add_level(&mut self) -> bool {
        self.model.append(&self.pool)
    }

    /// The first level anchors the chain and is never removable here
    pub fn can_remove(&self, index: usize) -> bool {
        index != 0 && index < self.model.len()
    }

    pub fn remove_level(&mut self, index: usize) -> Result<HierarchyLevel> {
        if index == 0 && !self.model.is_empty() {
            return Err(LineageError::RootLevelLocked);
        }
        self.model.remove(index)
    }

    /// Whether the name or any level differs from the opening state
    ///
    /// Always true in create mode.
    pub fn is_dirty(&self) -> bool {
        match &self.mode {
            EditorMode::Create => true,
            EditorMode::Update { original, .. } => {
                original.name != self.name.trim()
                    || !self.model.same_assignments(&original.levels)
            }
        }
    }

    pub fn save_blocker(&self) -> Option<SaveBlocker> {
        if self.model.is_empty() {
            return Some(SaveBlocker::NoLevels);
        }
        if self.name.trim().is_empty() {
            return Some(SaveBlocker::EmptyName);
        }
        if let Some(level) = self.model.first_unassigned() {
            return Some(SaveBlocker::UnassignedLevel { level });
        }
        if !self.is_dirty() {
            return Some(SaveBlocker::Unchanged);
        }
        None
    }

    pub fn can_save(&self) -> bool {
        self.save_blocker().is_none()
    }

    /// Submit the model to the store
    ///
    /// Local state is left as it was when the store fails; nothing is rolled
    /// back or retried here.
    pub async fn save(&mut self, store: &dyn LineageStore) -> Result<Lineage> {
        if let Some(blocker) = self.save_blocker() {
            return Err(LineageError::SaveBlocked(blocker));
        }

        let name = self.name.trim();
        match &self.mode {
            EditorMode::Create => {
                let rows = self.model.to_create_rows(name);
                store.create_lineage(&rows).await?;
                info!(lineage = %name, levels = rows.len(), "created lineage");
            }
            EditorMode::Update {
                original,
                company_id,
                other_names,
            } => {
                if other_names.contains(name) {
                    return Err(LineageError::LineageExists {
                        name: name.to_string(),
                    });
                }

                let rows = self.model.to_update_rows(name, *company_id);
                store.update_lineage(&rows).await?;

                if original.name != name {
                    store.delete_lineage(&original.name).await?;
                    info!(from = %original.name, to = %name, "renamed lineage");
                }
                info!(lineage = %name, levels = rows.len(), "updated lineage");
            }
        }

        Ok(Lineage {
            name: name.to_string(),
            levels: self.model.levels().to_vec(),
        })
    }
}

/// Pool for an update session: positions not held by other lineages
///
/// A position held by both the edited lineage and another one stays in the
/// pool; the edited lineage wins.
pub fn remaining_positions(
    name: &str,
    positions: Vec<Position>,
    rows: &[LineageRow],
) -> Vec<Position> {
    let own: HashSet<PositionId> = rows
        .iter()
        .filter(|r| r.name == name)
        .map(|r| r.position_id)
        .collect();
    let taken: HashSet<PositionId> = rows
        .iter()
        .filter(|r| r.name != name)
        .map(|r| r.position_id)
        .collect();

    for shared in own.intersection(&taken) {
        warn!(
            lineage = name,
            position = %shared,
            "position belongs to more than one lineage"
        );
    }

    positions
        .into_iter()
        .filter(|p| own.contains(&p.id) || !taken.contains(&p.id))
        .collect()
}
