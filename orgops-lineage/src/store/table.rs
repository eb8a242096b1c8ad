//! Row-table mutations shared by the adapters

use crate::error::{LineageError, Result};
use crate::types::{CompanyId, LineageRow, LineageUpdateRow, NewLineageRow};
use serde::{Deserialize, Serialize};

/// The flat lineage table, as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct LineageTable {
    rows: Vec<LineageRow>,
}

impl LineageTable {
    pub(crate) fn new(rows: Vec<LineageRow>) -> Self {
        Self { rows }
    }

    pub(crate) fn rows(&self) -> &[LineageRow] {
        &self.rows
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r.name == name)
    }

    pub(crate) fn create(&mut self, rows: &[NewLineageRow], company_id: CompanyId) -> Result<()> {
        for name in distinct_names(rows.iter().map(|r| r.name.as_str())) {
            if self.contains(name) {
                return Err(LineageError::LineageExists {
                    name: name.to_string(),
                });
            }
        }
        self.rows
            .extend(rows.iter().cloned().map(|r| r.into_row(company_id)));
        Ok(())
    }

    pub(crate) fn replace(&mut self, rows: &[LineageUpdateRow]) {
        let names = distinct_names(rows.iter().map(|r| r.name.as_str()));
        self.rows.retain(|r| !names.contains(&r.name.as_str()));
        self.rows.extend(rows.iter().cloned().map(LineageRow::from));
    }

    pub(crate) fn delete(&mut self, name: &str) -> Result<usize> {
        let before = self.rows.len();
        self.rows.retain(|r| r.name != name);
        match before - self.rows.len() {
            0 => Err(LineageError::LineageNotFound {
                name: name.to_string(),
            }),
            removed => Ok(removed),
        }
    }
}

/// Distinct names carried by a payload, in first-seen order
fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionId;

    fn new_row(name: &str, position: i64, level: u32) -> NewLineageRow {
        NewLineageRow {
            position_id: PositionId::new(position),
            hierarchical_level: level,
            name: name.into(),
        }
    }

    #[test]
    fn test_create_rejects_existing_name() {
        let mut table = LineageTable::default();
        table
            .create(&[new_row("Ops", 1, 1)], CompanyId::new(3))
            .unwrap();
        assert_eq!(table.rows()[0].company_id, CompanyId::new(3));

        let err = table
            .create(&[new_row("Ops", 2, 1)], CompanyId::new(3))
            .unwrap_err();
        assert!(matches!(err, LineageError::LineageExists { .. }));
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_replace_swaps_all_rows_of_name() {
        let mut table = LineageTable::default();
        table
            .create(
                &[new_row("Ops", 1, 1), new_row("Ops", 2, 2), new_row("Field", 3, 1)],
                CompanyId::default(),
            )
            .unwrap();

        table.replace(&[LineageUpdateRow {
            position_id: PositionId::new(9),
            hierarchical_level: 1,
            name: "Ops".into(),
            company_id: CompanyId::default(),
        }]);

        let ops: Vec<_> = table.rows().iter().filter(|r| r.name == "Ops").collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].position_id, PositionId::new(9));
        assert!(table.contains("Field"));
    }

    #[test]
    fn test_delete_missing_name() {
        let mut table = LineageTable::default();
        assert!(matches!(
            table.delete("nope"),
            Err(LineageError::LineageNotFound { .. })
        ));
    }
}
