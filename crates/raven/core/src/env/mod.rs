//! Read-only collaborators consumed by the simulation.
//!
//! [`TunablesOracle`] supplies named constants at construction time,
//! [`WorldView`] answers geometry and population queries while bots update,
//! and [`ArenaLayout`] describes the static arena a world is built from.
mod arena;
mod tunables;
mod view;

pub use arena::{ArenaLayout, CacheSpec};
pub use tunables::TunablesOracle;
pub use view::{BotSnapshot, CacheSnapshot, WorldView};
