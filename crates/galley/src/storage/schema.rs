//! `SQLite` schema definitions for galley.
//!
//! Three tables mirror the inventory backend: `items`, `positions` and
//! `users`. A `metadata` table holds the schema version.

/// SQL statement to create the items table.
pub const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    subcategory TEXT,
    item_type TEXT NOT NULL DEFAULT '',
    common INTEGER NOT NULL DEFAULT 0,
    description TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the positions table.
pub const CREATE_POSITIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS positions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    code TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    consumed INTEGER NOT NULL DEFAULT 0,
    available INTEGER NOT NULL,
    percentage_available INTEGER NOT NULL,
    unit TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the users table.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    role TEXT NOT NULL,
    employee_number TEXT NOT NULL,
    base TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Items are always read ordered by name.
pub const CREATE_ITEMS_NAME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_items_name ON items(name)
";

/// SQL statement to create an index on `item_id` for grouping positions.
pub const CREATE_POSITIONS_ITEM_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_positions_item ON positions(item_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_ITEMS_TABLE,
    CREATE_POSITIONS_TABLE,
    CREATE_USERS_TABLE,
    CREATE_ITEMS_NAME_INDEX,
    CREATE_POSITIONS_ITEM_INDEX,
    CREATE_METADATA_TABLE,
];
