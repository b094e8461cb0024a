use std::fmt;

use strum::{Display, EnumIter, IntoStaticStr};

/// Process-unique identifier for any addressable simulation object.
///
/// Identifiers are handed out by the world's registry and never reused while
/// the simulation runs, so a stale id simply fails to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Sender id used for messages that originate from the world itself.
    pub const WORLD: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_world(self) -> bool {
        self.0 == Self::WORLD.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BotStatus {
    #[default]
    Spawning,
    Alive,
    Dead,
}

/// Team membership. `Neutral` bots play free-for-all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Team {
    #[default]
    Neutral,
    Red,
    Blue,
    Green,
    Yellow,
}

/// Weapon kinds a bot can carry. At most one instance of each is held.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponType {
    Blaster,
    Shotgun,
    RailGun,
    RocketLauncher,
    GrenadeLauncher,
}

impl WeaponType {
    /// Weapons a dying team bot hands back to its team's caches when it was
    /// not carrying them.
    pub const TEAM_LOADOUT: [WeaponType; 3] = [
        WeaponType::Shotgun,
        WeaponType::RailGun,
        WeaponType::RocketLauncher,
    ];

    /// Prefix used for the weapon's tunables (`Shotgun_FiringFreq`, ...).
    pub const fn tunable_prefix(self) -> &'static str {
        match self {
            WeaponType::Blaster => "Blaster",
            WeaponType::Shotgun => "Shotgun",
            WeaponType::RailGun => "RailGun",
            WeaponType::RocketLauncher => "RocketLauncher",
            WeaponType::GrenadeLauncher => "GrenadeLauncher",
        }
    }
}
