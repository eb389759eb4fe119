//! `galley` - Cabin crew galley inventory
//!
//! This library holds the inventory of a single aircraft's galleys: items,
//! the positions (trolleys, standard units, ovens) they are stowed in, and
//! how much of each position has been consumed. The [`InventoryStore`] keeps
//! the list in memory for a session and writes through a [`Backend`];
//! [`views`] derives the pages shown to the crew.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod views;

pub use backend::Backend;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Availability, Item, ItemTotals, NewItem, NewUser, Position, User};
pub use storage::{SqliteBackend, StorageStats};
pub use store::{InventoryRules, InventoryStore, UpdateOutcome};
