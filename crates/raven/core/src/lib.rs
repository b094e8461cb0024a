//! Deterministic simulation core for Raven-style arena bots.
//!
//! `raven-core` owns the rules of the arena: bot bodies and their AI
//! subsystems, the goal-driven brain, projectiles, and the telegram system
//! entities use to talk to each other. Everything advances through
//! [`World::tick`], and all time is simulated, so a world built from the same
//! layout, configuration and seed replays identically.
//!
//! Collaborators are injected as traits: named constants come from a
//! [`TunablesOracle`], and bots read their surroundings through a
//! [`WorldView`].
pub mod bot;
pub mod brain;
pub mod config;
pub mod env;
pub mod error;
pub mod math;
pub mod messaging;
pub mod projectile;
pub mod regulator;
pub mod time;
pub mod types;
pub mod world;

#[cfg(test)]
mod testing;

pub use bot::{Bot, BotBody};
pub use brain::{BotGoal, Brain, GoalContext, GoalEvaluator, GoalKind};
pub use config::{BotConfig, GrenadeConfig, ProjectileSpec, SteeringConfig, WeaponConfig, WeaponSpec};
pub use env::{ArenaLayout, BotSnapshot, CacheSnapshot, CacheSpec, TunablesOracle, WorldView};
pub use error::{ConfigError, WorldError};
pub use math::{Vector2D, Wall2D};
pub use messaging::{Delivery, DispatchOutcome, MessageDispatcher, MessageKind, Outbox, Payload, Telegram};
pub use projectile::{Explosion, Projectile, ProjectileKind, ProjectileRequest};
pub use regulator::Regulator;
pub use time::SimClock;
pub use types::{BotStatus, EntityId, Team, WeaponType};
pub use world::{ArenaSnapshot, ScoreEntry, World, WorldEvent};
