//! Event types for different topics.

use raven_core::{EntityId, Explosion, Team, Telegram, Vector2D};
use serde::{Deserialize, Serialize};

/// Population and damage events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    BotAdded {
        bot: EntityId,
        team: Team,
    },
    BotRemoved {
        bot: EntityId,
    },
    BotSpawned {
        bot: EntityId,
        position: Vector2D,
        time: f64,
    },
    BotKilled {
        victim: EntityId,
        killer: EntityId,
        time: f64,
    },
    Explosion {
        explosion: Explosion,
        time: f64,
    },
}

/// Telegram routing events. High volume; subscribe only when needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessagingEvent {
    Delivered { telegram: Telegram, consumed: bool },
    Dropped { telegram: Telegram },
}

/// Published once per completed simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    /// Ticks completed since the runtime started.
    pub tick: u64,
    /// Simulated time after the tick.
    pub time: f64,
    pub alive_bots: usize,
    pub projectiles: usize,
}
