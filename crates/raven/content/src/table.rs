//! Name-keyed numeric table.

use std::collections::BTreeMap;

use raven_core::TunablesOracle;

/// Flat map from tunable name to value.
///
/// Integers and floats share one representation; the oracle's `get_int`
/// rejects values with a fractional part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TunableTable {
    values: BTreeMap<String, f64>,
}

impl TunableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Layers `overrides` on top of this table. Names present in both take
    /// the override's value.
    pub fn merge(&mut self, overrides: &TunableTable) {
        for (name, value) in overrides.iter() {
            self.set(name, value);
        }
    }
}

impl FromIterator<(String, f64)> for TunableTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl TunablesOracle for TunableTable {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}
