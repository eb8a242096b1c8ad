//! Persisted lineage rows and their grouped form

use super::ids::{CompanyId, PositionId};
use super::level::HierarchyLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored row: one position at one level of a named lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRow {
    pub name: String,
    pub position_id: PositionId,
    pub hierarchical_level: u32,
    pub company_id: CompanyId,
}

/// Create payload row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineageRow {
    pub position_id: PositionId,
    pub hierarchical_level: u32,
    pub name: String,
}

impl NewLineageRow {
    /// Stamp the tenant onto a create row
    pub fn into_row(self, company_id: CompanyId) -> LineageRow {
        LineageRow {
            name: self.name,
            position_id: self.position_id,
            hierarchical_level: self.hierarchical_level,
            company_id,
        }
    }
}

/// Update payload row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageUpdateRow {
    pub position_id: PositionId,
    pub hierarchical_level: u32,
    pub name: String,
    pub company_id: CompanyId,
}

impl From<LineageUpdateRow> for LineageRow {
    fn from(row: LineageUpdateRow) -> Self {
        Self {
            name: row.name,
            position_id: row.position_id,
            hierarchical_level: row.hierarchical_level,
            company_id: row.company_id,
        }
    }
}

/// A named reporting chain, levels ordered top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub name: String,
    pub levels: Vec<HierarchyLevel>,
}

impl Lineage {
    pub fn position_ids(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.levels.iter().filter_map(|l| l.position_id)
    }
}

/// Group a flat row table into lineages, sorted by name
pub fn group_lineages(rows: &[LineageRow]) -> Vec<Lineage> {
    let mut by_name: BTreeMap<&str, Vec<&LineageRow>> = BTreeMap::new();
    for row in rows {
        by_name.entry(row.name.as_str()).or_default().push(row);
    }

    by_name
        .into_iter()
        .map(|(name, mut rows)| {
            rows.sort_by_key(|r| r.hierarchical_level);
            Lineage {
                name: name.to_string(),
                levels: rows
                    .into_iter()
                    .map(|r| HierarchyLevel::assigned(r.hierarchical_level, r.position_id))
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, position: i64, level: u32) -> LineageRow {
        LineageRow {
            name: name.into(),
            position_id: PositionId::new(position),
            hierarchical_level: level,
            company_id: CompanyId::default(),
        }
    }

    #[test]
    fn test_group_lineages_orders_names_and_levels() {
        let rows = vec![
            row("Ops Chain", 20, 2),
            row("Field", 7, 1),
            row("Ops Chain", 10, 1),
        ];

        let lineages = group_lineages(&rows);
        assert_eq!(lineages.len(), 2);
        assert_eq!(lineages[0].name, "Field");
        assert_eq!(lineages[1].name, "Ops Chain");
        assert_eq!(
            lineages[1].levels,
            vec![
                HierarchyLevel::assigned(1, 10),
                HierarchyLevel::assigned(2, 20)
            ]
        );
    }

    #[test]
    fn test_update_payload_shape() {
        let row = LineageUpdateRow {
            position_id: PositionId::new(5),
            hierarchical_level: 1,
            name: "Chain A".into(),
            company_id: CompanyId::new(9),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "position_id": 5,
                "hierarchical_level": 1,
                "name": "Chain A",
                "company_id": 9
            })
        );
    }
}
