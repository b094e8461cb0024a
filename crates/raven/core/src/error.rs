//! Error types surfaced by the simulation core.
//!
//! The core distinguishes three kinds of failure:
//!
//! - **Dropped deliveries** are not errors. A telegram addressed to an entity
//!   that no longer exists is discarded and reported as
//!   [`crate::DispatchOutcome::Dropped`].
//! - **Invalid state requests** (possessing a dead bot, exorcising a bot nobody
//!   possesses) are silent no-ops.
//! - **Configuration failures** are fatal at construction. Every tunable is
//!   resolved up front and a missing or malformed value aborts startup.

use thiserror::Error;

use crate::EntityId;

/// Failure while resolving a named tunable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing tunable `{name}`")]
    MissingConstant { name: String },

    #[error("tunable `{name}` = {value} is not an integer")]
    NotAnInteger { name: String, value: f64 },

    #[error("tunable `{name}` = {value} is out of range: {reason}")]
    OutOfRange {
        name: String,
        value: f64,
        reason: &'static str,
    },
}

/// Failure of an administrative world operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("bot {0} is not registered")]
    UnknownBot(EntityId),

    #[error("arena has no spawn points")]
    NoSpawnPoints,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
