//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::views::catalog::{SortKey, StockLevel};
use crate::views::issues::{IssueCategory, Severity};

/// Home page arguments.
#[derive(Debug, Args)]
pub struct HomeCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Item search arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to match against item name or code
    pub query: Option<String>,

    /// Only items of this type
    #[arg(short = 't', long = "type")]
    pub item_type: Option<String>,

    /// Only items at this stock level
    #[arg(short, long, value_enum)]
    pub level: Option<StockLevelArg>,

    /// Sort key (defaults to the configured sort)
    #[arg(short, long, value_enum)]
    pub sort: Option<SortKeyArg>,

    /// Sort descending
    #[arg(short, long)]
    pub desc: bool,

    /// Only print name suggestions for the query
    #[arg(long)]
    pub suggest: bool,

    /// List the item types available for filtering
    #[arg(long, conflicts_with_all = ["query", "suggest"])]
    pub types: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Inventory commands.
#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Show the inventory checklist
    List {
        /// Mark these item ids as checked for this listing
        #[arg(long, value_name = "ITEM")]
        check: Vec<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Set the consumed amount of a position
    Consume {
        /// Item id
        item: i64,
        /// Position id
        position: i64,
        /// New consumed amount
        consumed: i64,
    },

    /// Step a position's consumption up or down, clamped to its quantity
    Adjust {
        /// Position id
        position: i64,
        /// Amount to add to consumed (negative to put back)
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        by: i64,
    },

    /// Add an item with its first position
    Add(AddItemArgs),

    /// Show totals over all positions of an item
    Totals {
        /// Item id
        item: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Fields for a new item.
#[derive(Debug, Args)]
pub struct AddItemArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Catalogue code
    #[arg(long)]
    pub code: String,

    /// Location code of the first position, e.g. G1-T2
    #[arg(long)]
    pub position: String,

    /// Capacity of the first position
    #[arg(long)]
    pub quantity: i64,

    /// Category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Subcategory
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Item type, used by the type filter
    #[arg(long = "type", default_value = "")]
    pub item_type: String,

    /// Unit of measure (defaults to the configured unit)
    #[arg(long)]
    pub unit: Option<String>,

    /// Part of the common catalogue
    #[arg(long)]
    pub common: bool,

    /// Description
    #[arg(long)]
    pub description: Option<String>,
}

/// Galley map arguments.
#[derive(Debug, Args)]
pub struct MapCommand {
    /// Aircraft type (defaults to the configured aircraft)
    #[arg(short, long)]
    pub aircraft: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Issue commands.
#[derive(Debug, Subcommand)]
pub enum IssuesCommand {
    /// Show recently reported issues
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Report an issue
    Report {
        /// Issue category
        #[arg(long, value_enum)]
        category: CategoryArg,

        /// What happened
        #[arg(short, long)]
        description: String,

        /// Severity
        #[arg(short, long, value_enum, default_value = "medium")]
        severity: SeverityArg,

        /// Affected item
        #[arg(short, long)]
        item: Option<String>,

        /// Affected location code
        #[arg(short, long)]
        location: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show a crew member (defaults to the configured user)
    Show {
        /// User id
        #[arg(short, long)]
        user: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// List crew members
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Register a crew member
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Crew role, e.g. Purser
        #[arg(long)]
        role: String,
        /// Employee number
        #[arg(long)]
        employee_number: String,
        /// Home base airport code
        #[arg(long)]
        base: Option<String>,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Stock level argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StockLevelArg {
    /// 70% or more available
    Good,
    /// 40% to 69% available
    Medium,
    /// Below 40% available
    Low,
}

impl From<StockLevelArg> for StockLevel {
    fn from(arg: StockLevelArg) -> Self {
        match arg {
            StockLevelArg::Good => Self::Good,
            StockLevelArg::Medium => Self::Medium,
            StockLevelArg::Low => Self::Low,
        }
    }
}

/// Sort key argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    /// Item name
    Name,
    /// Item code
    Code,
    /// Percentage available
    Availability,
    /// Category
    Category,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Name => Self::Name,
            SortKeyArg::Code => Self::Code,
            SortKeyArg::Availability => Self::Availability,
            SortKeyArg::Category => Self::Category,
        }
    }
}

/// Issue category argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Item not on board
    Missing,
    /// Item damaged
    Damaged,
    /// Item expired
    Expired,
    /// Fewer than planned
    Shortage,
    /// Galley equipment fault
    Equipment,
    /// Anything else
    Other,
}

impl From<CategoryArg> for IssueCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Missing => Self::Missing,
            CategoryArg::Damaged => Self::Damaged,
            CategoryArg::Expired => Self::Expired,
            CategoryArg::Shortage => Self::Shortage,
            CategoryArg::Equipment => Self::Equipment,
            CategoryArg::Other => Self::Other,
        }
    }
}

/// Severity argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    /// Can wait
    Low,
    /// Handle on arrival
    Medium,
    /// Affects this flight
    High,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_arg_conversion() {
        assert_eq!(StockLevel::from(StockLevelArg::Good), StockLevel::Good);
        assert_eq!(StockLevel::from(StockLevelArg::Medium), StockLevel::Medium);
        assert_eq!(StockLevel::from(StockLevelArg::Low), StockLevel::Low);
    }

    #[test]
    fn test_sort_key_arg_conversion() {
        assert_eq!(SortKey::from(SortKeyArg::Name), SortKey::Name);
        assert_eq!(SortKey::from(SortKeyArg::Code), SortKey::Code);
        assert_eq!(SortKey::from(SortKeyArg::Availability), SortKey::Availability);
        assert_eq!(SortKey::from(SortKeyArg::Category), SortKey::Category);
    }

    #[test]
    fn test_category_arg_conversion() {
        assert_eq!(
            IssueCategory::from(CategoryArg::Equipment),
            IssueCategory::Equipment
        );
        assert_eq!(IssueCategory::from(CategoryArg::Other), IssueCategory::Other);
    }

    #[test]
    fn test_severity_arg_conversion() {
        assert_eq!(Severity::from(SeverityArg::High), Severity::High);
        assert_eq!(Severity::from(SeverityArg::Low), Severity::Low);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }
}
