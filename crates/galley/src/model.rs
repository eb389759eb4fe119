//! Core inventory types for galley.
//!
//! Items are trackable goods; each item is stowed at one or more positions
//! (galley/trolley locations) that track their own consumption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest quantity a single position may hold.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Rounded integer percentage of `available` over `quantity`.
///
/// Halves round up. A zero (or negative) quantity yields 0, not 100.
#[must_use]
pub fn percentage_available(available: i64, quantity: i64) -> i64 {
    if quantity <= 0 {
        return 0;
    }
    // floor(available * 100 / quantity + 1/2), widened so no i64 input overflows
    let (available, quantity) = (i128::from(available), i128::from(quantity));
    let rounded = (available * 200 + quantity).div_euclid(quantity * 2);
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

/// Consumption figures derived from a quantity and a consumed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Amount used.
    pub consumed: i64,
    /// Quantity minus consumed.
    pub available: i64,
    /// Rounded percentage of quantity still available.
    pub percentage_available: i64,
}

impl Availability {
    /// Derive availability for a position holding `quantity` with `consumed` used.
    #[must_use]
    pub fn compute(quantity: i64, consumed: i64) -> Self {
        let available = quantity.saturating_sub(consumed);
        Self {
            consumed,
            available,
            percentage_available: percentage_available(available, quantity),
        }
    }
}

/// A stowage location holding some quantity of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Backend-assigned identifier.
    pub id: i64,
    /// The owning item.
    pub item_id: i64,
    /// Galley/trolley location label, e.g. `G1-T2`.
    pub code: String,
    /// Capacity of this position.
    pub quantity: i64,
    /// Amount used.
    pub consumed: i64,
    /// Quantity minus consumed.
    pub available: i64,
    /// Rounded percentage of quantity still available.
    pub percentage_available: i64,
    /// Unit of measure.
    pub unit: String,
    /// Last time consumption was written.
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Current consumption figures.
    #[must_use]
    pub fn availability(&self) -> Availability {
        Availability {
            consumed: self.consumed,
            available: self.available,
            percentage_available: self.percentage_available,
        }
    }

    /// Overwrite the derived fields and timestamp.
    pub fn apply(&mut self, availability: Availability, updated_at: DateTime<Utc>) {
        self.consumed = availability.consumed;
        self.available = availability.available;
        self.percentage_available = availability.percentage_available;
        self.updated_at = updated_at;
    }
}

/// An item row as stored by the backend, without its positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Catalogue code.
    pub code: String,
    /// Category, e.g. "Beverages".
    pub category: String,
    /// Optional subcategory, e.g. "Soft drinks".
    pub subcategory: Option<String>,
    /// Item type used by the type filter, e.g. "drink", "tool".
    pub item_type: String,
    /// Whether the item is part of the common catalogue.
    pub common: bool,
    /// Free-text description.
    pub description: Option<String>,
}

/// A trackable inventory good together with its positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Catalogue code.
    pub code: String,
    /// Category.
    pub category: String,
    /// Optional subcategory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Item type.
    pub item_type: String,
    /// Whether the item is part of the common catalogue.
    pub common: bool,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Positions in backend order.
    pub positions: Vec<Position>,
    /// Session-local checklist mark. Never persisted.
    pub checked: bool,
}

impl Item {
    /// Join a backend record with its positions. `checked` starts false.
    #[must_use]
    pub fn from_record(record: ItemRecord, positions: Vec<Position>) -> Self {
        Self {
            id: record.id,
            name: record.name,
            code: record.code,
            category: record.category,
            subcategory: record.subcategory,
            item_type: record.item_type,
            common: record.common,
            description: record.description,
            positions,
            checked: false,
        }
    }

    /// Aggregate quantity, consumption and availability over all positions.
    #[must_use]
    pub fn totals(&self) -> ItemTotals {
        let mut totals = self
            .positions
            .iter()
            .fold(ItemTotals::default(), |mut acc, p| {
                acc.quantity = acc.quantity.saturating_add(p.quantity);
                acc.consumed = acc.consumed.saturating_add(p.consumed);
                acc.available = acc.available.saturating_add(p.available);
                acc
            });
        totals.percentage_available = percentage_available(totals.available, totals.quantity);
        totals
    }

    /// Find a position of this item by id.
    #[must_use]
    pub fn position(&self, position_id: i64) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == position_id)
    }
}

/// Item-level aggregate over all positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTotals {
    /// Sum of position quantities.
    pub quantity: i64,
    /// Sum of consumed amounts.
    pub consumed: i64,
    /// Sum of available amounts.
    pub available: i64,
    /// Rounded aggregate percentage, 0 when total quantity is 0.
    pub percentage_available: i64,
}

/// Fields for creating an item together with its first position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewItem {
    /// Display name (required).
    pub name: String,
    /// Catalogue code (required).
    pub code: String,
    /// Category.
    pub category: String,
    /// Optional subcategory.
    pub subcategory: Option<String>,
    /// Item type.
    pub item_type: String,
    /// Common-catalogue flag, false when not given.
    pub common: Option<bool>,
    /// Free-text description.
    pub description: Option<String>,
    /// Location code of the first position (required).
    pub position_code: String,
    /// Capacity of the first position.
    pub quantity: i64,
    /// Unit of measure, the configured default when not given.
    pub unit: Option<String>,
}

/// An item row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRecord {
    /// Display name.
    pub name: String,
    /// Catalogue code.
    pub code: String,
    /// Category.
    pub category: String,
    /// Optional subcategory.
    pub subcategory: Option<String>,
    /// Item type.
    pub item_type: String,
    /// Common-catalogue flag.
    pub common: bool,
    /// Free-text description.
    pub description: Option<String>,
}

/// A position row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPositionRecord {
    /// Owning item.
    pub item_id: i64,
    /// Location code.
    pub code: String,
    /// Capacity.
    pub quantity: i64,
    /// Initial consumption figures.
    pub availability: Availability,
    /// Unit of measure.
    pub unit: String,
    /// Creation time.
    pub updated_at: DateTime<Utc>,
}

/// A crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Crew role, e.g. "Purser".
    pub role: String,
    /// Airline employee number.
    pub employee_number: String,
    /// Home base airport code.
    pub base: Option<String>,
}

/// Fields for registering a crew member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Crew role.
    pub role: String,
    /// Airline employee number.
    pub employee_number: String,
    /// Home base airport code.
    pub base: Option<String>,
}
