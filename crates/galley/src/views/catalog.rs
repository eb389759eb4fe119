//! Item search: stock levels, filtering, sorting and suggestions.
//!
//! Everything here is a pure function over the store's item list.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Item;

/// Percentage thresholds separating the stock levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockThresholds {
    /// At or above this percentage an item is [`StockLevel::Good`].
    pub good: u8,
    /// At or above this (and below `good`) an item is [`StockLevel::Medium`].
    pub medium: u8,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self { good: 70, medium: 40 }
    }
}

/// Stock-level label derived from an item's aggregate percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// Well stocked.
    Good,
    /// Running down.
    Medium,
    /// Needs restocking.
    Low,
}

impl StockLevel {
    /// Bucket a percentage.
    #[must_use]
    pub fn from_percentage(percentage: i64, thresholds: StockThresholds) -> Self {
        if percentage >= i64::from(thresholds.good) {
            Self::Good
        } else if percentage >= i64::from(thresholds.medium) {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Level of an item from its totals over all positions.
    #[must_use]
    pub fn of(item: &Item, thresholds: StockThresholds) -> Self {
        Self::from_percentage(item.totals().percentage_available, thresholds)
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Field an item list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Display name.
    #[default]
    Name,
    /// Catalogue code.
    Code,
    /// Aggregate percentage available.
    Availability,
    /// Category.
    Category,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Current selection on the item search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Substring to match against name or code.
    pub search: Option<String>,
    /// Only items of this type.
    pub item_type: Option<String>,
    /// Only items at this stock level.
    pub stock_level: Option<StockLevel>,
    /// Sort key.
    pub sort: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Case-insensitive substring match on name or code.
///
/// An empty needle matches everything.
#[must_use]
pub fn matches_search(item: &Item, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || item.name.to_lowercase().contains(&needle)
        || item.code.to_lowercase().contains(&needle)
}

/// Whether an item is of the given type, compared case-insensitively.
#[must_use]
pub fn matches_type(item: &Item, item_type: &str) -> bool {
    item.item_type.eq_ignore_ascii_case(item_type.trim())
}

/// Items of the given type, compared case-insensitively.
#[must_use]
pub fn filter_by_type<'a>(items: &'a [Item], item_type: &str) -> Vec<&'a Item> {
    items.iter().filter(|i| matches_type(i, item_type)).collect()
}

/// Items whose aggregate stock falls in `level`.
#[must_use]
pub fn filter_by_stock_level<'a>(
    items: &'a [Item],
    level: StockLevel,
    thresholds: StockThresholds,
) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|i| StockLevel::of(i, thresholds) == level)
        .collect()
}

fn compare(a: &Item, b: &Item, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Code => a.code.to_lowercase().cmp(&b.code.to_lowercase()),
        SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        SortKey::Availability => a
            .totals()
            .percentage_available
            .cmp(&b.totals().percentage_available),
    }
}

/// Sort in place. The sort is stable, so ties keep their current order.
pub fn sort_items(items: &mut [&Item], key: SortKey, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Apply every filter of `query`, then sort.
#[must_use]
pub fn apply<'a>(
    items: &'a [Item],
    query: &ItemQuery,
    thresholds: StockThresholds,
) -> Vec<&'a Item> {
    let mut selected: Vec<&Item> = items
        .iter()
        .filter(|i| query.search.as_deref().map_or(true, |s| matches_search(i, s)))
        .filter(|i| query.item_type.as_deref().map_or(true, |t| matches_type(i, t)))
        .filter(|i| {
            query
                .stock_level
                .map_or(true, |level| StockLevel::of(i, thresholds) == level)
        })
        .collect();
    sort_items(&mut selected, query.sort, query.direction);
    selected
}

/// Up to `limit` items whose name or code contains `text`.
///
/// Blank text suggests nothing.
#[must_use]
pub fn suggestions<'a>(items: &'a [Item], text: &str, limit: usize) -> Vec<&'a Item> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|i| matches_search(i, text))
        .take(limit)
        .collect()
}

/// Distinct item types, sorted, for the type filter.
#[must_use]
pub fn item_types(items: &[Item]) -> Vec<String> {
    let mut types: Vec<String> = items
        .iter()
        .map(|i| i.item_type.clone())
        .filter(|t| !t.is_empty())
        .collect();
    types.sort_by_key(|t| t.to_lowercase());
    types.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    types
}

/// Consumed amount after a stepper press, kept within `0..=quantity`.
#[must_use]
pub fn step(current: i64, delta: i64, quantity: i64) -> i64 {
    current.saturating_add(delta).clamp(0, quantity.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{item, position};

    fn stocked(id: i64, name: &str, quantity: i64, consumed: i64) -> Item {
        item(id, name, vec![position(id, id, quantity, consumed)])
    }

    fn sample() -> Vec<Item> {
        let mut coffee = stocked(1, "Coffee", 10, 2); // 80
        coffee.code = "BEV-COF".to_string();
        coffee.category = "beverages".to_string();
        let mut blanket = stocked(2, "blanket", 10, 5); // 50
        blanket.code = "CMF-BLK".to_string();
        blanket.item_type = "comfort".to_string();
        blanket.category = "Comfort".to_string();
        let mut apple = stocked(3, "Apple juice", 10, 7); // 30
        apple.code = "BEV-APJ".to_string();
        let mut kit = stocked(4, "First aid kit", 100, 61); // 39
        kit.code = "MED-FAK".to_string();
        kit.item_type = "Tool".to_string();
        kit.category = "Medical".to_string();
        vec![coffee, blanket, apple, kit]
    }

    fn names(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_stock_level_boundaries() {
        let t = StockThresholds::default();
        assert_eq!(StockLevel::from_percentage(100, t), StockLevel::Good);
        assert_eq!(StockLevel::from_percentage(70, t), StockLevel::Good);
        assert_eq!(StockLevel::from_percentage(69, t), StockLevel::Medium);
        assert_eq!(StockLevel::from_percentage(40, t), StockLevel::Medium);
        assert_eq!(StockLevel::from_percentage(39, t), StockLevel::Low);
        assert_eq!(StockLevel::from_percentage(0, t), StockLevel::Low);
    }

    #[test]
    fn test_stock_level_custom_thresholds() {
        let t = StockThresholds { good: 90, medium: 50 };
        assert_eq!(StockLevel::from_percentage(80, t), StockLevel::Medium);
        assert_eq!(StockLevel::from_percentage(45, t), StockLevel::Low);
    }

    #[test]
    fn test_stock_level_display() {
        assert_eq!(StockLevel::Good.to_string(), "Good");
        assert_eq!(StockLevel::Medium.to_string(), "Medium");
        assert_eq!(StockLevel::Low.to_string(), "Low");
    }

    #[test]
    fn test_filter_low_is_strictly_below_40() {
        let items = sample();
        let low = filter_by_stock_level(&items, StockLevel::Low, StockThresholds::default());
        assert_eq!(names(&low), vec!["Apple juice", "First aid kit"]);
        assert!(low.iter().all(|i| i.totals().percentage_available < 40));

        let all_low: Vec<&Item> = items
            .iter()
            .filter(|i| i.totals().percentage_available < 40)
            .collect();
        assert_eq!(low.len(), all_low.len());
    }

    #[test]
    fn test_filter_by_type_case_insensitive() {
        let items = sample();
        assert_eq!(names(&filter_by_type(&items, "tool")), vec!["First aid kit"]);
        assert_eq!(filter_by_type(&items, "DRINK").len(), 2);
        assert!(filter_by_type(&items, "oven").is_empty());
    }

    #[test]
    fn test_apply_type_filter_matches_filter_by_type() {
        let items = sample();
        for item_type in ["tool", " Drink ", "comfort", "oven"] {
            let query = ItemQuery {
                item_type: Some(item_type.to_string()),
                ..ItemQuery::default()
            };
            let mut expected = filter_by_type(&items, item_type);
            sort_items(&mut expected, SortKey::Name, SortDirection::Ascending);
            assert_eq!(
                names(&apply(&items, &query, StockThresholds::default())),
                names(&expected),
                "type {item_type:?}"
            );
        }
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let items = sample();
        let mut refs: Vec<&Item> = items.iter().collect();
        sort_items(&mut refs, SortKey::Name, SortDirection::Ascending);
        assert_eq!(
            names(&refs),
            vec!["Apple juice", "blanket", "Coffee", "First aid kit"]
        );

        sort_items(&mut refs, SortKey::Name, SortDirection::Descending);
        assert_eq!(
            names(&refs),
            vec!["First aid kit", "Coffee", "blanket", "Apple juice"]
        );
    }

    #[test]
    fn test_sort_by_availability() {
        let items = sample();
        let mut refs: Vec<&Item> = items.iter().collect();
        sort_items(&mut refs, SortKey::Availability, SortDirection::Ascending);
        assert_eq!(
            names(&refs),
            vec!["Apple juice", "First aid kit", "blanket", "Coffee"]
        );
    }

    #[test]
    fn test_sort_by_code_and_category() {
        let items = sample();
        let mut refs: Vec<&Item> = items.iter().collect();
        sort_items(&mut refs, SortKey::Code, SortDirection::Ascending);
        assert_eq!(refs[0].code, "BEV-APJ");
        assert_eq!(refs[3].code, "MED-FAK");

        sort_items(&mut refs, SortKey::Category, SortDirection::Ascending);
        assert_eq!(refs[3].category, "Medical");
    }

    #[test]
    fn test_matches_search() {
        let items = sample();
        assert!(matches_search(&items[0], "coff"));
        assert!(matches_search(&items[0], "bev-"));
        assert!(matches_search(&items[0], ""));
        assert!(!matches_search(&items[0], "tea"));
    }

    #[test]
    fn test_apply_combines_filters() {
        let items = sample();
        let query = ItemQuery {
            search: Some("bev".to_string()),
            item_type: Some("drink".to_string()),
            stock_level: Some(StockLevel::Low),
            ..ItemQuery::default()
        };
        let result = apply(&items, &query, StockThresholds::default());
        assert_eq!(names(&result), vec!["Apple juice"]);
    }

    #[test]
    fn test_apply_default_query_sorts_by_name() {
        let items = sample();
        let result = apply(&items, &ItemQuery::default(), StockThresholds::default());
        assert_eq!(result.len(), 4);
        assert_eq!(result[0].name, "Apple juice");
    }

    #[test]
    fn test_suggestions() {
        let items = sample();
        assert_eq!(suggestions(&items, "BEV", 5).len(), 2);
        assert_eq!(suggestions(&items, "bev", 1).len(), 1);
        assert!(suggestions(&items, "   ", 5).is_empty());
        assert_eq!(names(&suggestions(&items, "kit", 5)), vec!["First aid kit"]);
    }

    #[test]
    fn test_item_types() {
        let items = sample();
        assert_eq!(item_types(&items), vec!["comfort", "drink", "Tool"]);
    }

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, -1, 10), 0);
        assert_eq!(step(3, 1, 10), 4);
        assert_eq!(step(10, 1, 10), 10);
        assert_eq!(step(5, -10, 10), 0);
        assert_eq!(step(2, 1, 0), 0);
    }
}
