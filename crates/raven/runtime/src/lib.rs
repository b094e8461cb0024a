//! Async orchestration for the Raven arena simulation.
//!
//! The simulation itself is synchronous and lives in `raven-core`. This crate
//! puts a [`raven_core::World`] behind a single-owner worker task, drives it
//! on a fixed tick cadence, and exposes it through a cloneable
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{CombatEvent, Event, EventBus, MessagingEvent, TickEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
