//! Inventory checklist: every item with its session mark and stock state.

use serde::Serialize;

use crate::model::{Item, ItemTotals};
use crate::views::catalog::{StockLevel, StockThresholds};

/// One checklist line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    /// Item id.
    pub item_id: i64,
    /// Display name.
    pub name: String,
    /// Catalogue code.
    pub code: String,
    /// Session mark.
    pub checked: bool,
    /// Aggregate over the item's positions.
    pub totals: ItemTotals,
    /// Stock label of the totals.
    pub level: StockLevel,
    /// Location codes of the item's positions.
    pub locations: Vec<String>,
}

/// The whole checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    /// Lines in store order.
    pub entries: Vec<ChecklistEntry>,
}

impl Checklist {
    /// Build the checklist from the store's items.
    #[must_use]
    pub fn build(items: &[Item], thresholds: StockThresholds) -> Self {
        let entries = items
            .iter()
            .map(|item| {
                let totals = item.totals();
                ChecklistEntry {
                    item_id: item.id,
                    name: item.name.clone(),
                    code: item.code.clone(),
                    checked: item.checked,
                    totals,
                    level: StockLevel::from_percentage(totals.percentage_available, thresholds),
                    locations: item.positions.iter().map(|p| p.code.clone()).collect(),
                }
            })
            .collect();
        Self { entries }
    }

    /// Number of checked lines.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.checked).count()
    }

    /// Checked lines as a rounded percentage of all lines.
    #[must_use]
    pub fn progress(&self) -> i64 {
        let total = i64::try_from(self.entries.len()).unwrap_or(i64::MAX);
        let checked = i64::try_from(self.checked_count()).unwrap_or(i64::MAX);
        crate::model::percentage_available(checked, total)
    }

    /// Whether every line is checked. An empty checklist is not complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.checked)
    }
}
