//! Read-only access to named numeric tunables.

use std::collections::{BTreeMap, HashMap};

use crate::ConfigError;

/// Key-to-number lookup service consulted once when components are built.
///
/// Implementors only provide [`lookup`](Self::lookup); the typed accessors
/// turn a missing or malformed value into a [`ConfigError`].
pub trait TunablesOracle: Send + Sync {
    /// Raw value of the tunable, if present.
    fn lookup(&self, name: &str) -> Option<f64>;

    fn get_double(&self, name: &str) -> Result<f64, ConfigError> {
        self.lookup(name)
            .ok_or_else(|| ConfigError::MissingConstant {
                name: name.to_string(),
            })
    }

    fn get_int(&self, name: &str) -> Result<i64, ConfigError> {
        let value = self.get_double(name)?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ConfigError::NotAnInteger {
                name: name.to_string(),
                value,
            });
        }
        Ok(value as i64)
    }
}

impl TunablesOracle for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl TunablesOracle for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}
