//! Storage layer for galley.
//!
//! This module provides the `SQLite` implementation of [`Backend`], holding
//! the `items`, `positions` and `users` tables in a single database file.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::model::{
    Availability, ItemRecord, NewItemRecord, NewPositionRecord, NewUser, Position, User,
};

/// `SQLite`-backed inventory tables.
///
/// The connection sits behind a mutex so the backend can be shared with
/// async tasks; every call is a short synchronous statement.
#[derive(Debug)]
pub struct SqliteBackend {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database, used by tests and dry runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("database connection mutex poisoned"))
    }

    /// Row counts and file size.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<i64> {
            let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        };

        let total_items = count("items")?;
        let total_positions = count("positions")?;
        let total_users = count("users")?;

        let last_update: Option<String> = conn
            .query_row("SELECT MAX(updated_at) FROM positions", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();
        let last_update = last_update
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_items,
            total_positions,
            total_users,
            last_update,
            db_size_bytes,
        })
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<ItemRecord> {
        Ok(ItemRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
            category: row.get(3)?,
            subcategory: row.get(4)?,
            item_type: row.get(5)?,
            common: row.get(6)?,
            description: row.get(7)?,
        })
    }

    fn row_to_position(row: &rusqlite::Row) -> rusqlite::Result<Position> {
        let id: i64 = row.get(0)?;
        let updated_at_str: String = row.get(8)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str).map_or_else(
            |_| {
                warn!(
                    "Position {} has unparseable updated_at {:?}, using now",
                    id, updated_at_str
                );
                Utc::now()
            },
            |dt| dt.with_timezone(&Utc),
        );

        Ok(Position {
            id,
            item_id: row.get(1)?,
            code: row.get(2)?,
            quantity: row.get(3)?,
            consumed: row.get(4)?,
            available: row.get(5)?,
            percentage_available: row.get(6)?,
            unit: row.get(7)?,
            updated_at,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: row.get(3)?,
            employee_number: row.get(4)?,
            base: row.get(5)?,
        })
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r"
            SELECT id, name, code, category, subcategory, item_type, common, description
            FROM items ORDER BY name COLLATE NOCASE, id
            ",
        )?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn fetch_positions(&self) -> Result<Vec<Position>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r"
            SELECT id, item_id, code, quantity, consumed, available,
                   percentage_available, unit, updated_at
            FROM positions ORDER BY id
            ",
        )?;
        let positions = stmt
            .query_map([], Self::row_to_position)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(positions)
    }

    async fn update_position(
        &self,
        position_id: i64,
        availability: Availability,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            r"
            UPDATE positions
            SET consumed = ?1, available = ?2, percentage_available = ?3, updated_at = ?4
            WHERE id = ?5
            ",
            params![
                availability.consumed,
                availability.available,
                availability.percentage_available,
                updated_at.to_rfc3339(),
                position_id,
            ],
        )?;

        if affected == 0 {
            return Err(Error::not_found("position", position_id));
        }
        debug!("Updated position {}", position_id);
        Ok(())
    }

    async fn insert_item(&self, item: &NewItemRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO items (name, code, category, subcategory, item_type, common, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                item.name,
                item.code,
                item.category,
                item.subcategory,
                item.item_type,
                item.common,
                item.description,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted item {} with id {}", item.code, id);
        Ok(id)
    }

    async fn insert_position(&self, position: &NewPositionRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO positions
                (item_id, code, quantity, consumed, available, percentage_available, unit, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                position.item_id,
                position.code,
                position.quantity,
                position.availability.consumed,
                position.availability.available,
                position.availability.percentage_available,
                position.unit,
                position.updated_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted position {} for item {}", id, position.item_id);
        Ok(id)
    }

    async fn delete_item(&self, item_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM items WHERE id = ?1", [item_id])?;
        if affected == 0 {
            return Err(Error::not_found("item", item_id));
        }
        Ok(())
    }

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, role, employee_number, base FROM users WHERE id = ?1",
                [user_id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, role, employee_number, base FROM users ORDER BY name, id",
        )?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<i64> {
        let conn = self.conn()?;
        let result = conn.execute(
            r"
            INSERT INTO users (name, email, role, employee_number, base)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![user.name, user.email, user.role, user.employee_number, user.base],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::validation(
                    "employee_number",
                    format!("{} is already registered", user.employee_number),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Statistics about the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of item rows.
    pub total_items: i64,
    /// Number of position rows.
    pub total_positions: i64,
    /// Number of user rows.
    pub total_users: i64,
    /// Most recent position write.
    pub last_update: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
