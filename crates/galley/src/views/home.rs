//! Home page summary.

use serde::Serialize;

use crate::model::Item;
use crate::views::catalog::{sort_items, SortDirection, SortKey, StockLevel, StockThresholds};

/// An item shown in the low-stock preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    /// Item id.
    pub item_id: i64,
    /// Display name.
    pub name: String,
    /// Aggregate percentage available.
    pub percentage_available: i64,
}

/// Counts shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of items.
    pub items: usize,
    /// Number of positions over all items.
    pub positions: usize,
    /// Items at [`StockLevel::Good`].
    pub good: usize,
    /// Items at [`StockLevel::Medium`].
    pub medium: usize,
    /// Items at [`StockLevel::Low`].
    pub low: usize,
    /// Items checked this session.
    pub checked: usize,
    /// Lowest-stock items, emptiest first.
    pub lowest: Vec<LowStockItem>,
}

impl Summary {
    /// Summarize `items`, previewing at most `preview` low-stock items.
    #[must_use]
    pub fn build(items: &[Item], thresholds: StockThresholds, preview: usize) -> Self {
        let mut summary = Self {
            items: items.len(),
            positions: items.iter().map(|i| i.positions.len()).sum(),
            good: 0,
            medium: 0,
            low: 0,
            checked: items.iter().filter(|i| i.checked).count(),
            lowest: Vec::new(),
        };

        for item in items {
            match StockLevel::of(item, thresholds) {
                StockLevel::Good => summary.good += 1,
                StockLevel::Medium => summary.medium += 1,
                StockLevel::Low => summary.low += 1,
            }
        }

        let mut low: Vec<&Item> = items
            .iter()
            .filter(|i| StockLevel::of(i, thresholds) == StockLevel::Low)
            .collect();
        sort_items(&mut low, SortKey::Availability, SortDirection::Ascending);
        summary.lowest = low
            .into_iter()
            .take(preview)
            .map(|i| LowStockItem {
                item_id: i.id,
                name: i.name.clone(),
                percentage_available: i.totals().percentage_available,
            })
            .collect();

        summary
    }

    /// Checked items as a rounded percentage of all items.
    #[must_use]
    pub fn checked_progress(&self) -> i64 {
        let total = i64::try_from(self.items).unwrap_or(i64::MAX);
        let checked = i64::try_from(self.checked).unwrap_or(i64::MAX);
        crate::model::percentage_available(checked, total)
    }
}
