//! Command-line interface for galley.
//!
//! This module provides the CLI structure for the `galley` binary. Each page
//! of the app is a subcommand.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddItemArgs, CategoryArg, ConfigCommand, HomeCommand, InventoryCommand, IssuesCommand,
    MapCommand, OutputFormat, ProfileCommand, SearchCommand, SeverityArg, SortKeyArg,
    StatusCommand, StockLevelArg,
};

/// galley - Cabin crew galley inventory
///
/// Tracks what is stowed in each galley compartment, how much of it has been
/// consumed, and which items still need checking before departure.
#[derive(Debug, Parser)]
#[command(name = "galley")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the inventory summary
    Home(HomeCommand),

    /// Search, filter and sort items
    Search(SearchCommand),

    /// Work the inventory checklist
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Show what is stowed in each galley compartment
    Map(MapCommand),

    /// List or report issues
    #[command(subcommand)]
    Issues(IssuesCommand),

    /// Show or register crew profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
