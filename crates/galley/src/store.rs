//! The session inventory store.
//!
//! [`InventoryStore`] holds every item and its positions in memory for the
//! session and mediates all reads and writes against the [`Backend`]. It is
//! constructed with an injected backend, loads once on open and again after
//! every added item, and needs no teardown.
//!
//! Failures follow three rules:
//! - read failures are logged and leave the previous list in place,
//! - write failures are logged and leave memory untouched (no optimistic update),
//! - only [`InventoryStore::add_item`] returns its error to the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::backend::Backend;
use crate::config::InventoryConfig;
use crate::error::{Error, Result};
use crate::model::{
    Availability, Item, ItemTotals, NewItem, NewItemRecord, NewPositionRecord, Position,
    MAX_QUANTITY,
};
use crate::views::catalog::step;

/// Validation rules applied to new items.
#[derive(Debug, Clone)]
pub struct InventoryRules {
    code_pattern: Regex,
    default_unit: String,
}

impl InventoryRules {
    /// Build rules from the inventory configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured code pattern is not a valid regex.
    pub fn from_config(config: &InventoryConfig) -> Result<Self> {
        let code_pattern = Regex::new(&config.code_pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid code_pattern: {e}"),
        })?;
        Ok(Self {
            code_pattern,
            default_unit: config.default_unit.clone(),
        })
    }

    fn check_code(&self, field: &'static str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::validation(field, "is required"));
        }
        if !self.code_pattern.is_match(value) {
            return Err(Error::validation(
                field,
                format!("{value:?} does not match {}", self.code_pattern.as_str()),
            ));
        }
        Ok(())
    }
}

/// Result of a consumption update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The backend accepted the write and memory now mirrors it.
    Applied(Availability),
    /// The item or position is not in the loaded list. Nothing was written.
    NotFound,
    /// The backend rejected the write. Memory is unchanged.
    Failed {
        /// The backend's error message.
        reason: String,
    },
}

impl UpdateOutcome {
    /// Whether the update reached the backend and memory.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// In-memory inventory for one session.
#[derive(Debug)]
pub struct InventoryStore<B> {
    backend: B,
    rules: InventoryRules,
    items: Vec<Item>,
    loading: bool,
    loaded_at: Option<DateTime<Utc>>,
}

impl<B: Backend> InventoryStore<B> {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    #[must_use]
    pub fn new(backend: B, rules: InventoryRules) -> Self {
        Self {
            backend,
            rules,
            items: Vec::new(),
            loading: false,
            loaded_at: None,
        }
    }

    /// Create a store and perform the initial load.
    pub async fn open(backend: B, rules: InventoryRules) -> Self {
        let mut store = Self::new(backend, rules);
        store.load().await;
        store
    }

    /// The backend this store writes through.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All items, ordered by name as the backend returned them.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, item_id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Look up a position by id across all items.
    #[must_use]
    pub fn find_position(&self, position_id: i64) -> Option<&Position> {
        self.items
            .iter()
            .flat_map(|i| i.positions.iter())
            .find(|p| p.id == position_id)
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// When the list was last successfully loaded.
    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Reload items and positions, logging instead of failing.
    ///
    /// On error the previous list is kept.
    pub async fn load(&mut self) {
        if let Err(e) = self.try_load().await {
            error!("Failed to load inventory: {}", e);
        }
    }

    /// Reload items and positions from the backend.
    ///
    /// Positions are grouped under their items and every `checked` mark is
    /// cleared. Returns the number of items loaded.
    ///
    /// # Errors
    ///
    /// Returns the backend error if either fetch fails; the previous list
    /// is kept in that case.
    pub async fn try_load(&mut self) -> Result<usize> {
        self.loading = true;
        let fetched = self.fetch_all().await;
        self.loading = false;

        let items = fetched?;
        let count = items.len();
        self.items = items;
        self.loaded_at = Some(Utc::now());
        info!("Loaded {} items", count);
        Ok(count)
    }

    async fn fetch_all(&self) -> Result<Vec<Item>> {
        let records = self.backend.fetch_items().await?;
        let positions = self.backend.fetch_positions().await?;

        let mut by_item: HashMap<i64, Vec<Position>> = HashMap::new();
        for position in positions {
            by_item.entry(position.item_id).or_default().push(position);
        }

        let items: Vec<Item> = records
            .into_iter()
            .map(|record| {
                let positions = by_item.remove(&record.id).unwrap_or_default();
                Item::from_record(record, positions)
            })
            .collect();

        for (item_id, orphans) in &by_item {
            warn!(
                "Ignoring {} positions of unknown item {}",
                orphans.len(),
                item_id
            );
        }

        Ok(items)
    }

    /// Set the consumed amount of one position.
    ///
    /// Available amount and percentage are derived from the position's
    /// quantity and written together with a fresh timestamp. Memory is only
    /// updated after the backend accepts the write. `new_consumed` is taken
    /// as given; callers clamp it (see [`crate::views::catalog::step`]).
    pub async fn update_position_consumption(
        &mut self,
        item_id: i64,
        position_id: i64,
        new_consumed: i64,
    ) -> UpdateOutcome {
        let Some((item_idx, pos_idx)) = self.locate(item_id, position_id) else {
            warn!(
                "Position {} of item {} not found, skipping update",
                position_id, item_id
            );
            return UpdateOutcome::NotFound;
        };

        let quantity = self.items[item_idx].positions[pos_idx].quantity;
        let availability = Availability::compute(quantity, new_consumed);
        let updated_at = Utc::now();

        if let Err(e) = self
            .backend
            .update_position(position_id, availability, updated_at)
            .await
        {
            error!("Failed to update position {}: {}", position_id, e);
            return UpdateOutcome::Failed {
                reason: e.to_string(),
            };
        }

        self.items[item_idx].positions[pos_idx].apply(availability, updated_at);
        debug!(
            "Position {} now {}/{} available ({}%)",
            position_id, availability.available, quantity, availability.percentage_available
        );
        UpdateOutcome::Applied(availability)
    }

    /// Set the consumed amount of one position from user input.
    ///
    /// Unlike [`update_position_consumption`](Self::update_position_consumption)
    /// the value must lie within `0..=quantity`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range amount. Nothing is
    /// written in that case.
    pub async fn set_consumed(
        &mut self,
        item_id: i64,
        position_id: i64,
        consumed: i64,
    ) -> Result<UpdateOutcome> {
        let Some((item_idx, pos_idx)) = self.locate(item_id, position_id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        let quantity = self.items[item_idx].positions[pos_idx].quantity;
        if !(0..=quantity).contains(&consumed) {
            return Err(Error::validation(
                "consumed",
                format!("{consumed} is outside 0..={quantity}"),
            ));
        }
        Ok(self
            .update_position_consumption(item_id, position_id, consumed)
            .await)
    }

    /// Move a position's consumed amount by `delta`, clamped to its quantity.
    ///
    /// A step that changes nothing writes nothing and reports the current
    /// figures as applied.
    pub async fn step_consumed(&mut self, position_id: i64, delta: i64) -> UpdateOutcome {
        let Some(position) = self.find_position(position_id) else {
            warn!("Position {} not found, skipping step", position_id);
            return UpdateOutcome::NotFound;
        };
        let (item_id, current) = (position.item_id, position.consumed);
        let next = step(current, delta, position.quantity);
        if next == current {
            return UpdateOutcome::Applied(position.availability());
        }
        self.update_position_consumption(item_id, position_id, next)
            .await
    }

    fn locate(&self, item_id: i64, position_id: i64) -> Option<(usize, usize)> {
        let item_idx = self.items.iter().position(|i| i.id == item_id)?;
        let pos_idx = self.items[item_idx]
            .positions
            .iter()
            .position(|p| p.id == position_id)?;
        Some((item_idx, pos_idx))
    }

    /// Flip the session checklist mark of an item.
    ///
    /// Returns the new state, or `None` if the item is unknown.
    pub fn toggle_checked(&mut self, item_id: i64) -> Option<bool> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            warn!("Item {} not found, cannot toggle", item_id);
            return None;
        };
        item.checked = !item.checked;
        Some(item.checked)
    }

    /// Totals over all positions of an item; zeroed if the item is unknown.
    #[must_use]
    pub fn item_totals(&self, item_id: i64) -> ItemTotals {
        self.item(item_id).map(Item::totals).unwrap_or_default()
    }

    /// Create an item with its first position, then reload everything.
    ///
    /// The position starts full: nothing consumed, 100% available (0% for an
    /// empty position). The two
    /// inserts are not atomic; if the position insert fails the item row is
    /// deleted again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or malformed fields, or the
    /// backend error of a failed insert.
    pub async fn add_item(&mut self, fields: NewItem) -> Result<i64> {
        let (record, position_code, quantity, unit) = self.prepare(fields)?;

        let item_id = self.backend.insert_item(&record).await?;

        let position = NewPositionRecord {
            item_id,
            code: position_code,
            quantity,
            availability: Availability::compute(quantity, 0),
            unit,
            updated_at: Utc::now(),
        };

        if let Err(e) = self.backend.insert_position(&position).await {
            error!(
                "Failed to insert position for item {}, removing item: {}",
                item_id, e
            );
            if let Err(cleanup) = self.backend.delete_item(item_id).await {
                warn!("Item {} left without a position: {}", item_id, cleanup);
            }
            return Err(e);
        }

        info!("Added item {} ({})", record.name, item_id);
        self.load().await;
        Ok(item_id)
    }

    fn prepare(&self, fields: NewItem) -> Result<(NewItemRecord, String, i64, String)> {
        let name = fields.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("name", "is required"));
        }
        let code = fields.code.trim().to_string();
        self.rules.check_code("code", &code)?;
        let position_code = fields.position_code.trim().to_string();
        self.rules.check_code("position code", &position_code)?;

        if !(0..=MAX_QUANTITY).contains(&fields.quantity) {
            return Err(Error::validation(
                "quantity",
                format!("must be between 0 and {MAX_QUANTITY}"),
            ));
        }

        let unit = fields
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.rules.default_unit.clone());

        let record = NewItemRecord {
            name,
            code,
            category: fields.category.trim().to_string(),
            subcategory: non_blank(fields.subcategory),
            item_type: fields.item_type.trim().to_string(),
            common: fields.common.unwrap_or(false),
            description: non_blank(fields.description),
        };
        Ok((record, position_code, fields.quantity, unit))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::logging::init_test_logging;
    use crate::model::{ItemRecord, NewUser, User};
    use crate::storage::SqliteBackend;

    /// Wraps a real database and fails selected calls on demand.
    #[derive(Debug)]
    struct FlakyBackend {
        inner: SqliteBackend,
        fail_item_reads: AtomicBool,
        fail_position_reads: AtomicBool,
        fail_updates: AtomicBool,
        fail_position_inserts: AtomicBool,
        deletes: AtomicUsize,
    }

    impl FlakyBackend {
        fn new() -> Self {
            Self {
                inner: SqliteBackend::open_in_memory().unwrap(),
                fail_item_reads: AtomicBool::new(false),
                fail_position_reads: AtomicBool::new(false),
                fail_updates: AtomicBool::new(false),
                fail_position_inserts: AtomicBool::new(false),
                deletes: AtomicUsize::new(0),
            }
        }

        fn check(flag: &AtomicBool, what: &str) -> Result<()> {
            if flag.load(Ordering::SeqCst) {
                Err(Error::backend(format!("{what} unavailable")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Backend for FlakyBackend {
        async fn fetch_items(&self) -> Result<Vec<ItemRecord>> {
            Self::check(&self.fail_item_reads, "items")?;
            self.inner.fetch_items().await
        }

        async fn fetch_positions(&self) -> Result<Vec<Position>> {
            Self::check(&self.fail_position_reads, "positions")?;
            self.inner.fetch_positions().await
        }

        async fn update_position(
            &self,
            position_id: i64,
            availability: Availability,
            updated_at: DateTime<Utc>,
        ) -> Result<()> {
            Self::check(&self.fail_updates, "update")?;
            self.inner
                .update_position(position_id, availability, updated_at)
                .await
        }

        async fn insert_item(&self, item: &NewItemRecord) -> Result<i64> {
            self.inner.insert_item(item).await
        }

        async fn insert_position(&self, position: &NewPositionRecord) -> Result<i64> {
            Self::check(&self.fail_position_inserts, "insert")?;
            self.inner.insert_position(position).await
        }

        async fn delete_item(&self, item_id: i64) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_item(item_id).await
        }

        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>> {
            self.inner.fetch_user(user_id).await
        }

        async fn fetch_users(&self) -> Result<Vec<User>> {
            self.inner.fetch_users().await
        }

        async fn insert_user(&self, user: &NewUser) -> Result<i64> {
            self.inner.insert_user(user).await
        }
    }

    fn rules() -> InventoryRules {
        InventoryRules::from_config(&InventoryConfig::default()).unwrap()
    }

    fn new_item(name: &str, code: &str, position_code: &str, quantity: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            code: code.to_string(),
            category: "Beverages".to_string(),
            item_type: "drink".to_string(),
            position_code: position_code.to_string(),
            quantity,
            ..NewItem::default()
        }
    }

    async fn store_with(items: &[(&str, i64)]) -> InventoryStore<FlakyBackend> {
        init_test_logging();
        let mut store = InventoryStore::open(FlakyBackend::new(), rules()).await;
        for (i, (name, quantity)) in items.iter().enumerate() {
            store
                .add_item(new_item(name, &format!("IT-{i}"), &format!("G1-T{i}"), *quantity))
                .await
                .unwrap();
        }
        store
    }

    fn first_position(store: &InventoryStore<FlakyBackend>, name: &str) -> (i64, i64) {
        let item = store.items().iter().find(|i| i.name == name).unwrap();
        (item.id, item.positions[0].id)
    }

    #[tokio::test]
    async fn test_open_empty() {
        let store = store_with(&[]).await;
        assert!(store.items().is_empty());
        assert!(!store.is_loading());
        assert!(store.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_add_item_creates_one_full_position() {
        let store = store_with(&[("Water", 24)]).await;

        assert_eq!(store.items().len(), 1);
        let item = &store.items()[0];
        assert_eq!(item.positions.len(), 1);
        let p = &item.positions[0];
        assert_eq!(p.quantity, 24);
        assert_eq!(p.consumed, 0);
        assert_eq!(p.available, 24);
        assert_eq!(p.percentage_available, 100);
        assert_eq!(p.unit, "pcs");
        assert!(!item.common);
        assert!(!item.checked);
    }

    #[tokio::test]
    async fn test_add_item_keeps_name_order() {
        let store = store_with(&[("Water", 10), ("Coffee", 5), ("Juice", 8)]).await;
        let names: Vec<&str> = store.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Juice", "Water"]);
    }

    #[tokio::test]
    async fn test_add_item_with_explicit_fields() {
        let mut store = store_with(&[]).await;
        let mut fields = new_item("  Tea ", "BEV-TEA", "G2-T1", 40);
        fields.common = Some(true);
        fields.unit = Some("bags".to_string());
        fields.subcategory = Some("   ".to_string());
        fields.description = Some("English breakfast".to_string());

        let id = store.add_item(fields).await.unwrap();
        let item = store.item(id).unwrap();
        assert_eq!(item.name, "Tea");
        assert!(item.common);
        assert!(item.subcategory.is_none());
        assert_eq!(item.description.as_deref(), Some("English breakfast"));
        assert_eq!(item.positions[0].unit, "bags");
        assert_eq!(item.positions[0].code, "G2-T1");
    }

    #[tokio::test]
    async fn test_add_item_requires_fields() {
        let mut store = store_with(&[]).await;

        let err = store.add_item(new_item("", "C", "G1", 1)).await.unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = store.add_item(new_item("Tea", "", "G1", 1)).await.unwrap_err();
        assert!(err.to_string().contains("code"));

        let err = store.add_item(new_item("Tea", "C", " ", 1)).await.unwrap_err();
        assert!(err.to_string().contains("position code"));

        let err = store.add_item(new_item("Tea", "C", "G1", -1)).await.unwrap_err();
        assert!(err.to_string().contains("quantity"));

        let err = store.add_item(new_item("Tea", "bad code!", "G1", 1)).await.unwrap_err();
        assert!(err.is_validation());

        assert!(store.items().is_empty());
        assert!(store.backend().fetch_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_item_position_failure_removes_item() {
        let mut store = store_with(&[("Water", 10)]).await;
        store
            .backend()
            .fail_position_inserts
            .store(true, Ordering::SeqCst);

        let result = store.add_item(new_item("Tea", "BEV-TEA", "G1-T9", 5)).await;
        assert!(result.is_err());
        assert_eq!(store.backend().deletes.load(Ordering::SeqCst), 1);
        assert_eq!(store.backend().fetch_items().await.unwrap().len(), 1);
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_update_consumption_example() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");

        let outcome = store.update_position_consumption(item_id, pos_id, 3).await;
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(Availability {
                consumed: 3,
                available: 7,
                percentage_available: 70,
            })
        );

        let outcome = store.update_position_consumption(item_id, pos_id, 10).await;
        assert!(outcome.is_applied());
        let p = store.find_position(pos_id).unwrap();
        assert_eq!(p.available, 0);
        assert_eq!(p.percentage_available, 0);
    }

    #[tokio::test]
    async fn test_update_consumption_persists() {
        let mut store = store_with(&[("Water", 8)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");

        store.update_position_consumption(item_id, pos_id, 1).await;
        store.load().await;

        let p = store.find_position(pos_id).unwrap();
        assert_eq!(p.consumed, 1);
        assert_eq!(p.available, 7);
        assert_eq!(p.percentage_available, 88);
    }

    #[tokio::test]
    async fn test_update_consumption_keeps_sum_invariant() {
        let mut store = store_with(&[("Water", 13)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");

        for consumed in 0..=13 {
            assert!(store
                .update_position_consumption(item_id, pos_id, consumed)
                .await
                .is_applied());
            let p = store.find_position(pos_id).unwrap();
            assert_eq!(p.available + p.consumed, p.quantity);
            assert_eq!(
                p.percentage_available,
                crate::model::percentage_available(p.available, p.quantity)
            );
        }
    }

    #[tokio::test]
    async fn test_update_unknown_position_is_noop() {
        let mut store = store_with(&[("Water", 10), ("Coffee", 4)]).await;
        let before = store.items().to_vec();
        let (water_id, _) = first_position(&store, "Water");
        let (_, coffee_pos) = first_position(&store, "Coffee");

        assert_eq!(
            store.update_position_consumption(water_id, 9999, 1).await,
            UpdateOutcome::NotFound
        );
        assert_eq!(
            store.update_position_consumption(9999, coffee_pos, 1).await,
            UpdateOutcome::NotFound
        );
        // A position is only found under its own item
        assert_eq!(
            store.update_position_consumption(water_id, coffee_pos, 1).await,
            UpdateOutcome::NotFound
        );
        assert_eq!(store.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_update_backend_failure_leaves_memory() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");
        store.backend().fail_updates.store(true, Ordering::SeqCst);

        let outcome = store.update_position_consumption(item_id, pos_id, 5).await;
        assert!(matches!(outcome, UpdateOutcome::Failed { .. }));

        let p = store.find_position(pos_id).unwrap();
        assert_eq!(p.consumed, 0);
        assert_eq!(p.available, 10);
    }

    #[tokio::test]
    async fn test_update_does_not_clamp() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");

        let outcome = store.update_position_consumption(item_id, pos_id, -1).await;
        assert_eq!(
            outcome,
            UpdateOutcome::Applied(Availability {
                consumed: -1,
                available: 11,
                percentage_available: 110,
            })
        );
    }

    #[tokio::test]
    async fn test_add_item_with_zero_quantity() {
        let store = store_with(&[("Empty", 0)]).await;
        let p = &store.items()[0].positions[0];

        assert_eq!(p.quantity, 0);
        assert_eq!(p.available, 0);
        assert_eq!(p.percentage_available, 0);
        assert_eq!(
            p.percentage_available,
            crate::model::percentage_available(p.available, p.quantity)
        );
    }

    #[tokio::test]
    async fn test_add_item_rejects_oversized_quantity() {
        let mut store = store_with(&[]).await;
        let err = store
            .add_item(new_item("Water", "BEV-001", "G1-T1", MAX_QUANTITY + 1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.items().is_empty());

        store
            .add_item(new_item("Water", "BEV-001", "G1-T1", MAX_QUANTITY))
            .await
            .unwrap();
        let (item_id, pos_id) = first_position(&store, "Water");
        let outcome = store.update_position_consumption(item_id, pos_id, 1).await;
        assert!(outcome.is_applied());
        assert_eq!(store.find_position(pos_id).unwrap().percentage_available, 100);
    }

    #[tokio::test]
    async fn test_set_consumed_rejects_out_of_range() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (item_id, pos_id) = first_position(&store, "Water");

        for consumed in [-1, 11, 50] {
            let err = store.set_consumed(item_id, pos_id, consumed).await.unwrap_err();
            assert!(err.is_validation(), "{consumed} accepted");
        }
        let p = store.find_position(pos_id).unwrap();
        assert_eq!(p.consumed, 0);
        assert_eq!(p.available, 10);

        let outcome = store.set_consumed(item_id, pos_id, 10).await.unwrap();
        assert!(outcome.is_applied());
        assert_eq!(store.find_position(pos_id).unwrap().available, 0);

        assert_eq!(
            store.set_consumed(item_id, 9999, 1).await.unwrap(),
            UpdateOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_step_consumed_clamps() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (_, pos_id) = first_position(&store, "Water");

        let outcome = store.step_consumed(pos_id, -1).await;
        assert_eq!(outcome, UpdateOutcome::Applied(Availability::compute(10, 0)));

        store.step_consumed(pos_id, 25).await;
        let p = store.find_position(pos_id).unwrap();
        assert_eq!(p.consumed, 10);
        assert_eq!(p.available, 0);

        store.step_consumed(pos_id, -3).await;
        assert_eq!(store.find_position(pos_id).unwrap().consumed, 7);

        assert_eq!(store.step_consumed(9999, 1).await, UpdateOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_toggle_checked_only_touches_one_item() {
        let mut store = store_with(&[("Water", 10), ("Coffee", 4)]).await;
        let (water_id, _) = first_position(&store, "Water");
        let before = store.items().to_vec();

        assert_eq!(store.toggle_checked(water_id), Some(true));
        for (old, new) in before.iter().zip(store.items()) {
            assert_eq!(old.positions, new.positions);
            assert_eq!(new.checked, new.id == water_id);
        }

        assert_eq!(store.toggle_checked(water_id), Some(false));
        assert_eq!(store.toggle_checked(12345), None);
    }

    #[tokio::test]
    async fn test_load_resets_checked() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (water_id, _) = first_position(&store, "Water");
        store.toggle_checked(water_id);

        store.load().await;
        assert!(!store.item(water_id).unwrap().checked);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_list() {
        let mut store = store_with(&[("Water", 10)]).await;
        let loaded_at = store.loaded_at();

        store.backend().fail_position_reads.store(true, Ordering::SeqCst);
        store.load().await;
        assert_eq!(store.items().len(), 1);
        assert!(!store.is_loading());
        assert_eq!(store.loaded_at(), loaded_at);

        store.backend().fail_position_reads.store(false, Ordering::SeqCst);
        store.backend().fail_item_reads.store(true, Ordering::SeqCst);
        assert!(store.try_load().await.is_err());
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_initial_load_failure_leaves_empty() {
        init_test_logging();
        let backend = FlakyBackend::new();
        backend.fail_item_reads.store(true, Ordering::SeqCst);

        let store = InventoryStore::open(backend, rules()).await;
        assert!(store.items().is_empty());
        assert!(store.loaded_at().is_none());
    }

    #[tokio::test]
    async fn test_load_groups_positions() {
        let mut store = store_with(&[("Water", 10), ("Coffee", 4)]).await;
        let (water_id, _) = first_position(&store, "Water");
        store
            .backend()
            .insert_position(&NewPositionRecord {
                item_id: water_id,
                code: "G2-T1".to_string(),
                quantity: 6,
                availability: Availability::compute(6, 0),
                unit: "pcs".to_string(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(store.try_load().await.unwrap(), 2);
        assert_eq!(store.item(water_id).unwrap().positions.len(), 2);
        let coffee = store.items().iter().find(|i| i.name == "Coffee").unwrap();
        assert_eq!(coffee.positions.len(), 1);
    }

    #[tokio::test]
    async fn test_item_totals() {
        let mut store = store_with(&[("Water", 10)]).await;
        let (water_id, pos_id) = first_position(&store, "Water");
        store
            .backend()
            .insert_position(&NewPositionRecord {
                item_id: water_id,
                code: "G2-T1".to_string(),
                quantity: 20,
                availability: Availability::compute(20, 10),
                unit: "pcs".to_string(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        store.load().await;
        store.update_position_consumption(water_id, pos_id, 3).await;

        let totals = store.item_totals(water_id);
        assert_eq!(totals.quantity, 30);
        assert_eq!(totals.consumed, 13);
        assert_eq!(totals.available, 17);
        assert_eq!(totals.percentage_available, 57);

        assert_eq!(store.item_totals(999), ItemTotals::default());
    }

    #[test]
    fn test_rules_reject_bad_pattern() {
        let config = InventoryConfig {
            code_pattern: "(".to_string(),
            ..InventoryConfig::default()
        };
        assert!(InventoryRules::from_config(&config).is_err());
    }
}
