//! HierarchyModel - the in-progress level list of one lineage
//!
//! Every mutation keeps two invariants:
//!
//! - no two levels hold the same position
//! - level numbers run `1..=len` in order, with no gaps
//!
//! The model never talks to storage. The editor owns one and flattens it into
//! payload rows on save.

use crate::error::{LineageError, Result};
use crate::types::{
    CompanyId, HierarchyLevel, LineageRow, LineageUpdateRow, NewLineageRow, Position, PositionId,
};
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyModel {
    levels: Vec<HierarchyLevel>,
}

impl HierarchyModel {
    /// An empty model (create flow)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from the stored rows of `name` (update flow)
    ///
    /// Rows of other lineages are ignored. Levels are ordered by their stored
    /// level and relabelled `1..=len`. A position stored on more than one
    /// level is kept on the topmost of them and cleared on the rest.
    pub fn hydrate(name: &str, rows: &[LineageRow]) -> Self {
        let mut own: Vec<&LineageRow> = rows.iter().filter(|r| r.name == name).collect();
        own.sort_by_key(|r| r.hierarchical_level);

        let contiguous = own
            .iter()
            .enumerate()
            .all(|(i, r)| r.hierarchical_level as usize == i + 1);
        if !contiguous {
            warn!(lineage = name, "stored levels are not contiguous, renumbering");
        }

        let distinct: HashSet<PositionId> = own.iter().map(|r| r.position_id).collect();
        if distinct.len() < own.len() {
            warn!(lineage = name, "stored levels repeat a position, clearing repeats");
        }

        own.into_iter()
            .map(|r| HierarchyLevel::assigned(r.hierarchical_level, r.position_id))
            .collect::<Vec<_>>()
            .into()
    }

    pub fn levels(&self) -> &[HierarchyLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Positions assigned anywhere in the model
    pub fn used_positions(&self) -> HashSet<PositionId> {
        self.levels.iter().filter_map(|l| l.position_id).collect()
    }

    /// Positions offered for the level at `index`
    ///
    /// Only positions held by levels *before* `index` are excluded. A position
    /// picked further down the chain is still offered here until this level
    /// is touched.
    pub fn available_positions<'a>(
        &self,
        index: usize,
        all_positions: &'a [Position],
    ) -> Vec<&'a Position> {
        let earlier: HashSet<PositionId> = self.levels[..index.min(self.levels.len())]
            .iter()
            .filter_map(|l| l.position_id)
            .collect();

        all_positions
            .iter()
            .filter(|p| !earlier.contains(&p.id))
            .collect()
    }

    /// Positions not assigned to any level
    pub fn unused_positions<'a>(&self, all_positions: &'a [Position]) -> Vec<&'a Position> {
        let used = self.used_positions();
        all_positions
            .iter()
            .filter(|p| !used.contains(&p.id))
            .collect()
    }

    /// Put `position_id` at `index`, clearing it from whichever other level held it
    pub fn assign(&mut self, index: usize, position_id: PositionId) -> Result<()> {
        self.check_index(index)?;

        for (i, level) in self.levels.iter_mut().enumerate() {
            if i != index && level.position_id == Some(position_id) {
                level.position_id = None;
            }
        }
        self.levels[index].position_id = Some(position_id);
        Ok(())
    }

    /// Clear the position at `index`, leaving the level in place
    pub fn unassign(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.levels[index].position_id = None;
        Ok(())
    }

    /// Drop the level at `index` and renumber the rest
    pub fn remove(&mut self, index: usize) -> Result<HierarchyLevel> {
        self.check_index(index)?;
        let removed = self.levels.remove(index);
        self.relabel();
        Ok(removed)
    }

    /// Append a level holding the first unused position
    ///
    /// Returns `false` and leaves the model untouched when every position is
    /// already in use.
    pub fn append(&mut self, all_positions: &[Position]) -> bool {
        let Some(first) = self.unused_positions(all_positions).first().map(|p| p.id) else {
            return false;
        };

        let level = self.next_level();
        self.levels.push(HierarchyLevel::assigned(level, first));
        true
    }

    /// Level number of the first level without a position
    pub fn first_unassigned(&self) -> Option<u32> {
        self.levels
            .iter()
            .find(|l| l.position_id.is_none())
            .map(|l| l.level)
    }

    /// Same `(level, position)` pairs in the same order
    pub fn same_assignments(&self, other: &[HierarchyLevel]) -> bool {
        self.levels.len() == other.len()
            && self
                .levels
                .iter()
                .zip(other)
                .all(|(a, b)| a.level == b.level && a.position_id == b.position_id)
    }

    /// Flatten into create payload rows; unassigned levels are skipped
    pub fn to_create_rows(&self, name: &str) -> Vec<NewLineageRow> {
        self.assigned()
            .map(|(level, position_id)| NewLineageRow {
                position_id,
                hierarchical_level: level,
                name: name.to_string(),
            })
            .collect()
    }

    /// Flatten into update payload rows; unassigned levels are skipped
    pub fn to_update_rows(&self, name: &str, company_id: CompanyId) -> Vec<LineageUpdateRow> {
        self.assigned()
            .map(|(level, position_id)| LineageUpdateRow {
                position_id,
                hierarchical_level: level,
                name: name.to_string(),
                company_id,
            })
            .collect()
    }

    fn assigned(&self) -> impl Iterator<Item = (u32, PositionId)> + '_ {
        self.levels
            .iter()
            .filter_map(|l| l.position_id.map(|p| (l.level, p)))
    }

    fn next_level(&self) -> u32 {
        u32::try_from(self.levels.len() + 1).unwrap_or(u32::MAX)
    }

    fn relabel(&mut self) {
        for (i, level) in self.levels.iter_mut().enumerate() {
            level.level = u32::try_from(i + 1).unwrap_or(u32::MAX);
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.levels.len() {
            Ok(())
        } else {
            Err(LineageError::LevelOutOfRange {
                index,
                len: self.levels.len(),
            })
        }
    }
}

impl From<Vec<HierarchyLevel>> for HierarchyModel {
    /// Adopt the given order; level numbers are rewritten to `1..=len` and
    /// later duplicates of a position are cleared.
    fn from(levels: Vec<HierarchyLevel>) -> Self {
        let mut seen = HashSet::new();
        let mut model = Self {
            levels: levels
                .into_iter()
                .map(|mut l| {
                    if let Some(p) = l.position_id {
                        if !seen.insert(p) {
                            l.position_id = None;
                        }
                    }
                    l
                })
                .collect(),
        };
        model.relabel();
        model
    }
}
