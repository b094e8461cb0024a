//! Tunables for the Raven simulation.
//!
//! Every numeric constant the core reads (speeds, regulator frequencies,
//! weapon and projectile parameters) is looked up by name through
//! [`raven_core::TunablesOracle`]. This crate provides the table behind that
//! oracle and the loaders that fill it from TOML:
//! - Stock values shipped in `data/raven.toml`
//! - Override files layered on top of the stock table
//!
//! Tunables are consumed once when the world is built and never change
//! afterwards.

pub mod table;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use table::TunableTable;

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, TunablesLoader};
