//! Lineage commands

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::CreateLineage;
pub use delete::DeleteLineage;
pub use get::GetLineage;
pub use list::ListLineages;
pub use update::UpdateLineage;

use crate::editor::HierarchyEditor;
use crate::error::{LineageError, Result};
use crate::types::PositionId;
use orgops_operations::{ExecutionResult, LogEntry, Operation};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Instant;

/// Wrap the outcome of a mutating command for the processor
fn logged<T>(op: &T, started: Instant, result: Result<Value>) -> ExecutionResult<Value, LineageError>
where
    T: Operation + Serialize,
{
    let value = match result {
        Ok(value) => value,
        Err(e) => return ExecutionResult::failed(e),
    };
    match serde_json::to_value(op) {
        Ok(input) => ExecutionResult::Logged {
            log_entry: LogEntry::since(op.op_string(), input, value.clone(), started),
            value,
        },
        Err(e) => ExecutionResult::failed(e.into()),
    }
}

/// Drive the editor until its levels hold exactly `position_ids`, top first
///
/// Goes through the editor's own operations so the usual invariants and pool
/// checks apply.
fn apply_positions(editor: &mut HierarchyEditor, position_ids: &[PositionId]) -> Result<()> {
    if position_ids.is_empty() {
        return Err(LineageError::missing_field("position_ids"));
    }

    let mut seen = HashSet::new();
    for id in position_ids {
        if !seen.insert(*id) {
            return Err(LineageError::invalid_value(
                "position_ids",
                format!("position {} listed more than once", id),
            ));
        }
    }

    while editor.levels().len() > position_ids.len() {
        editor.remove_level(editor.levels().len() - 1)?;
    }

    for (index, id) in position_ids.iter().enumerate() {
        if index >= editor.levels().len() && !editor.add_level() {
            return Err(LineageError::invalid_value(
                "position_ids",
                format!("no free position for level {}", index + 1),
            ));
        }
        editor.assign(index, *id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompanyId, HierarchyLevel, LineageRow, Position};

    fn positions(ids: &[i64]) -> Vec<Position> {
        ids.iter()
            .map(|&id| Position::new(id, format!("Position {}", id)))
            .collect()
    }

    fn ids(raw: &[i64]) -> Vec<PositionId> {
        raw.iter().copied().map(PositionId::new).collect()
    }

    #[test]
    fn test_apply_positions_on_empty_editor() {
        let mut editor = HierarchyEditor::create(positions(&[1, 2, 3]));
        apply_positions(&mut editor, &ids(&[3, 1])).unwrap();
        assert_eq!(
            editor.levels(),
            &[HierarchyLevel::assigned(1, 3), HierarchyLevel::assigned(2, 1)]
        );
    }

    #[test]
    fn test_apply_positions_reorders_and_shrinks() {
        let rows: Vec<LineageRow> = [(1, 1), (2, 2), (3, 3)]
            .iter()
            .map(|&(level, p)| LineageRow {
                name: "Ops".into(),
                position_id: PositionId::new(p),
                hierarchical_level: level,
                company_id: CompanyId::default(),
            })
            .collect();
        let mut editor =
            HierarchyEditor::hydrate("Ops", positions(&[1, 2, 3]), &rows, CompanyId::default())
                .unwrap();

        apply_positions(&mut editor, &ids(&[2, 1])).unwrap();
        assert_eq!(
            editor.levels(),
            &[HierarchyLevel::assigned(1, 2), HierarchyLevel::assigned(2, 1)]
        );
    }

    #[test]
    fn test_apply_positions_rejects_duplicates() {
        let mut editor = HierarchyEditor::create(positions(&[1, 2]));
        let err = apply_positions(&mut editor, &ids(&[1, 1])).unwrap_err();
        assert!(matches!(err, LineageError::InvalidValue { .. }));
    }

    #[test]
    fn test_apply_positions_rejects_empty() {
        let mut editor = HierarchyEditor::create(positions(&[1]));
        let err = apply_positions(&mut editor, &[]).unwrap_err();
        assert!(matches!(err, LineageError::MissingField { .. }));
    }

    #[test]
    fn test_apply_positions_rejects_unknown_position() {
        let mut editor = HierarchyEditor::create(positions(&[1]));
        let err = apply_positions(&mut editor, &ids(&[7])).unwrap_err();
        assert!(matches!(err, LineageError::PositionNotFound { id: 7 }));
    }
}
