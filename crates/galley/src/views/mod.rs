//! Page-level views.
//!
//! Each submodule backs one page of the app: item search ([`catalog`]),
//! the inventory checklist, the galley map, issue reporting, the crew
//! profile and the home summary. Views derive from the store's list or
//! from local data and hold no state of their own.

pub mod catalog;
pub mod checklist;
pub mod galley_map;
pub mod home;
pub mod issues;
pub mod profile;
