use std::fmt;

use strum::{Display, IntoStaticStr};

use crate::types::{EntityId, WeaponType};

/// Message kinds exchanged between entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Carries [`Payload::Damage`].
    Damage,
    /// Sent by a bot to its killer.
    YouGotMe,
    /// Carries [`Payload::Entity`] naming the shooter.
    GunshotSound,
    /// Carries [`Payload::Entity`] naming the removed bot.
    UserHasRemovedBot,
    /// Carries [`Payload::Entity`] naming the team's shared target.
    TeamTarget,
    /// Path planner reply: a path to the requested position exists.
    PathReady,
    /// Path planner reply: the requested position is unreachable.
    NoPathAvailable,
    /// Carries [`Payload::Weapon`]; stocks a team weapon cache.
    DepositWeapon,
}

/// Kind-specific extra information attached to a telegram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    #[default]
    None,
    Damage(u32),
    Entity(EntityId),
    Weapon(WeaponType),
}

impl Payload {
    pub fn damage(self) -> Option<u32> {
        match self {
            Payload::Damage(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn entity(self) -> Option<EntityId> {
        match self {
            Payload::Entity(id) => Some(id),
            _ => None,
        }
    }

    pub fn weapon(self) -> Option<WeaponType> {
        match self {
            Payload::Weapon(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Immutable addressed message.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telegram {
    pub sender: EntityId,
    pub receiver: EntityId,
    pub kind: MessageKind,
    /// Simulation time at which the telegram becomes deliverable.
    pub dispatch_time: f64,
    pub payload: Payload,
}

impl Telegram {
    pub fn new(
        sender: EntityId,
        receiver: EntityId,
        kind: MessageKind,
        dispatch_time: f64,
        payload: Payload,
    ) -> Self {
        Self {
            sender,
            receiver,
            kind,
            dispatch_time,
            payload,
        }
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} @ {:.3}",
            self.kind, self.sender, self.receiver, self.dispatch_time
        )
    }
}

/// When a dispatched telegram should reach its receiver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delivery {
    /// Handled before the dispatch call returns.
    Immediate,
    /// Queued for the first drain at or after `now + delay` seconds.
    Delayed(f64),
}

impl Delivery {
    /// Delay in seconds. Negative and non-finite delays collapse to zero.
    pub fn delay(self) -> f64 {
        match self {
            Delivery::Immediate => 0.0,
            Delivery::Delayed(delay) if delay.is_finite() && delay > 0.0 => delay,
            Delivery::Delayed(_) => 0.0,
        }
    }
}
