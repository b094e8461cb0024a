//! Tunables loader.
//!
//! Files hold a single `[constants]` table of numbers:
//!
//! ```toml
//! [constants]
//! Bot_MaxSpeed = 1.0
//! Bot_MaxHealth = 100
//! ```

use std::path::Path;

use anyhow::Context;

use crate::TunableTable;
use crate::loaders::{LoadResult, read_file};

const RAVEN_DEFAULTS: &str = include_str!("../../data/raven.toml");

/// Loader for tunables from TOML files.
pub struct TunablesLoader;

impl TunablesLoader {
    /// Load a tunables file on its own.
    pub fn load(path: &Path) -> LoadResult<TunableTable> {
        let content = read_file(path)?;
        TunableTable::from_toml_str(&content)
            .with_context(|| format!("Failed to load tunables from {}", path.display()))
    }

    /// Load a file of overrides on top of the stock Raven values.
    pub fn load_with_defaults(path: &Path) -> LoadResult<TunableTable> {
        let mut table = TunableTable::raven_defaults()?;
        table.merge(&Self::load(path)?);
        Ok(table)
    }
}

impl TunableTable {
    /// Parse a `[constants]` table. Every value must be a number.
    pub fn from_toml_str(content: &str) -> LoadResult<Self> {
        let document: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tunables TOML: {}", e))?;

        let constants = document
            .get("constants")
            .and_then(toml::Value::as_table)
            .ok_or_else(|| anyhow::anyhow!("Tunables TOML has no [constants] table"))?;

        constants
            .iter()
            .map(|(name, value)| {
                let number = match value {
                    toml::Value::Integer(int) => *int as f64,
                    toml::Value::Float(float) => *float,
                    other => anyhow::bail!(
                        "Tunable `{}` must be a number, found {}",
                        name,
                        other.type_str()
                    ),
                };
                Ok((name.clone(), number))
            })
            .collect()
    }

    /// The stock Raven tunables shipped with this crate.
    pub fn raven_defaults() -> LoadResult<Self> {
        Self::from_toml_str(RAVEN_DEFAULTS).context("Embedded raven.toml is malformed")
    }
}
