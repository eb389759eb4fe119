//! Configuration management for galley.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::views::catalog::{SortKey, StockThresholds};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "galley";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "inventory.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GALLEY_`, `__` between sections)
/// 2. TOML config file at `~/.config/galley/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Inventory rules.
    pub inventory: InventoryConfig,
    /// List presentation.
    pub display: DisplayConfig,
    /// Crew member and aircraft defaults.
    pub crew: CrewConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/galley/inventory.db`
    pub database_path: Option<PathBuf>,
}

/// Inventory rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Minimum percentage available for the "Good" stock level.
    pub good_threshold: u8,
    /// Minimum percentage available for the "Medium" stock level.
    pub medium_threshold: u8,
    /// Pattern item and position codes must match.
    pub code_pattern: String,
    /// Unit of measure used when none is given.
    pub default_unit: String,
}

/// List presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Sort key for item lists when none is given.
    pub default_sort: SortKey,
    /// Maximum number of search suggestions.
    pub max_suggestions: usize,
    /// Number of lowest-stock items shown on the home summary.
    pub low_stock_preview: usize,
}

/// Crew configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    /// User id shown by `profile show` when none is given.
    pub user_id: Option<i64>,
    /// Aircraft type whose galley layout the map shows.
    pub aircraft: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let thresholds = StockThresholds::default();
        Self {
            good_threshold: thresholds.good,
            medium_threshold: thresholds.medium,
            code_pattern: r"^[A-Za-z0-9][A-Za-z0-9_./-]*$".to_string(),
            default_unit: "pcs".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Name,
            max_suggestions: 5,
            low_stock_preview: 5,
        }
    }
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            aircraft: "A320".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GALLEY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let inventory = &self.inventory;
        if inventory.good_threshold > 100 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "good_threshold ({}) must be at most 100",
                    inventory.good_threshold
                ),
            });
        }

        if inventory.medium_threshold >= inventory.good_threshold {
            return Err(Error::ConfigValidation {
                message: format!(
                    "medium_threshold ({}) must be lower than good_threshold ({})",
                    inventory.medium_threshold, inventory.good_threshold
                ),
            });
        }

        if regex::Regex::new(&inventory.code_pattern).is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid code_pattern: {}", inventory.code_pattern),
            });
        }

        if inventory.default_unit.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_unit must not be empty".to_string(),
            });
        }

        if self.display.max_suggestions == 0 {
            return Err(Error::ConfigValidation {
                message: "max_suggestions must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Stock-level thresholds as configured.
    #[must_use]
    pub fn thresholds(&self) -> StockThresholds {
        StockThresholds {
            good: self.inventory.good_threshold,
            medium: self.inventory.medium_threshold,
        }
    }
}
