//! The inventory backend contract.
//!
//! The backend is the source of truth for the `items`, `positions` and
//! `users` tables. The inventory store talks to it only through this trait;
//! [`crate::storage::SqliteBackend`] is the bundled implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{
    Availability, ItemRecord, NewItemRecord, NewPositionRecord, NewUser, Position, User,
};

/// Table-level access to the inventory backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All item rows, ordered by name.
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>>;

    /// All position rows. Each references its owning item by id.
    async fn fetch_positions(&self) -> Result<Vec<Position>>;

    /// Rewrite the consumption fields and timestamp of one position.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::NotFound`] if no position has this id.
    async fn update_position(
        &self,
        position_id: i64,
        availability: Availability,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Insert an item row and return its generated id.
    async fn insert_item(&self, item: &NewItemRecord) -> Result<i64>;

    /// Insert a position row and return its generated id.
    async fn insert_position(&self, position: &NewPositionRecord) -> Result<i64>;

    /// Delete an item row together with its positions.
    async fn delete_item(&self, item_id: i64) -> Result<()>;

    /// A single crew member, if present.
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>>;

    /// All crew members, ordered by name.
    async fn fetch_users(&self) -> Result<Vec<User>>;

    /// Insert a crew member and return the generated id.
    async fn insert_user(&self, user: &NewUser) -> Result<i64>;
}
