//! Tunable parameters resolved once when bots, weapons and projectiles are built.
//!
//! Every struct here can be read from a [`TunablesOracle`] with `from_oracle`.
//! A missing or malformed name is a [`ConfigError`] and must abort startup.
//! The `Default` impls carry the stock Raven values.

use crate::ConfigError;
use crate::env::TunablesOracle;
use crate::types::WeaponType;

fn positive(oracle: &dyn TunablesOracle, name: &str) -> Result<f64, ConfigError> {
    let value = oracle.get_double(name)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value,
            reason: "must be positive",
        })
    }
}

fn non_negative(oracle: &dyn TunablesOracle, name: &str) -> Result<f64, ConfigError> {
    let value = oracle.get_double(name)?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value,
            reason: "must not be negative",
        })
    }
}

fn count(oracle: &dyn TunablesOracle, name: &str) -> Result<u32, ConfigError> {
    let value = oracle.get_int(name)?;
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
        name: name.to_string(),
        value: value as f64,
        reason: "must be a non-negative count",
    })
}

/// Per-bot tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct BotConfig {
    pub max_health: i32,
    pub scale: f64,
    pub max_speed: f64,
    pub mass: f64,
    pub max_force: f64,
    /// Radians per update.
    pub max_turn_rate: f64,
    /// Radians.
    pub field_of_view: f64,
    pub memory_span: f64,
    pub reaction_time: f64,
    pub aim_accuracy: f64,
    pub aim_persistence: f64,
    pub weapon_selection_frequency: f64,
    pub goal_appraisal_frequency: f64,
    pub targeting_frequency: f64,
    pub trigger_frequency: f64,
    pub vision_frequency: f64,
    pub hit_flash_time: f64,
    pub frame_rate: f64,
    pub aggro_goal_tweaker: f64,
    pub explore_goal_tweaker: f64,
    pub steering: SteeringConfig,
}

impl BotConfig {
    pub fn from_oracle(oracle: &dyn TunablesOracle) -> Result<Self, ConfigError> {
        let max_health = oracle.get_int("Bot_MaxHealth")?;
        let max_health = i32::try_from(max_health)
            .ok()
            .filter(|health| *health > 0)
            .ok_or(ConfigError::OutOfRange {
                name: "Bot_MaxHealth".to_string(),
                value: max_health as f64,
                reason: "must be a positive health value",
            })?;

        Ok(Self {
            max_health,
            scale: positive(oracle, "Bot_Scale")?,
            max_speed: positive(oracle, "Bot_MaxSpeed")?,
            mass: positive(oracle, "Bot_Mass")?,
            max_force: positive(oracle, "Bot_MaxForce")?,
            max_turn_rate: positive(oracle, "Bot_MaxHeadTurnRate")?,
            field_of_view: positive(oracle, "Bot_FOV")?.to_radians(),
            memory_span: non_negative(oracle, "Bot_MemorySpan")?,
            reaction_time: non_negative(oracle, "Bot_ReactionTime")?,
            aim_accuracy: non_negative(oracle, "Bot_AimAccuracy")?,
            aim_persistence: non_negative(oracle, "Bot_AimPersistance")?,
            weapon_selection_frequency: oracle.get_double("Bot_WeaponSelectionFrequency")?,
            goal_appraisal_frequency: oracle.get_double("Bot_GoalAppraisalUpdateFreq")?,
            targeting_frequency: oracle.get_double("Bot_TargetingUpdateFreq")?,
            trigger_frequency: oracle.get_double("Bot_TriggerUpdateFreq")?,
            vision_frequency: oracle.get_double("Bot_VisionUpdateFreq")?,
            hit_flash_time: non_negative(oracle, "HitFlashTime")?,
            frame_rate: positive(oracle, "FrameRate")?,
            aggro_goal_tweaker: non_negative(oracle, "Bot_AggroGoalTweaker")?,
            explore_goal_tweaker: non_negative(oracle, "Bot_ExploreGoalTweaker")?,
            steering: SteeringConfig::from_oracle(oracle)?,
        })
    }

    /// Number of render frames the hit flash stays visible.
    pub fn hit_flash_frames(&self) -> i32 {
        (self.frame_rate * self.hit_flash_time) as i32
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            scale: 0.8,
            max_speed: 1.0,
            mass: 1.0,
            max_force: 1.0,
            max_turn_rate: 0.2,
            field_of_view: 180f64.to_radians(),
            memory_span: 5.0,
            reaction_time: 0.2,
            aim_accuracy: 0.0,
            aim_persistence: 1.0,
            weapon_selection_frequency: 2.0,
            goal_appraisal_frequency: 4.0,
            targeting_frequency: 2.0,
            trigger_frequency: 8.0,
            vision_frequency: 4.0,
            hit_flash_time: 0.2,
            frame_rate: 60.0,
            aggro_goal_tweaker: 1.0,
            explore_goal_tweaker: 0.05,
            steering: SteeringConfig::default(),
        }
    }
}

/// Weights and shapes of the steering behaviors.
#[derive(Clone, Debug, PartialEq)]
pub struct SteeringConfig {
    pub seek_weight: f64,
    pub arrive_weight: f64,
    pub wander_weight: f64,
    pub separation_weight: f64,
    pub wall_avoidance_weight: f64,
    pub wander_radius: f64,
    pub wander_distance: f64,
    /// Jitter applied per second of simulated time.
    pub wander_jitter_per_sec: f64,
    /// Neighbour radius used by separation.
    pub view_distance: f64,
    pub wall_detection_feeler_length: f64,
}

impl SteeringConfig {
    pub fn from_oracle(oracle: &dyn TunablesOracle) -> Result<Self, ConfigError> {
        Ok(Self {
            seek_weight: non_negative(oracle, "SeekWeight")?,
            arrive_weight: non_negative(oracle, "ArriveWeight")?,
            wander_weight: non_negative(oracle, "WanderWeight")?,
            separation_weight: non_negative(oracle, "SeparationWeight")?,
            wall_avoidance_weight: non_negative(oracle, "WallAvoidanceWeight")?,
            wander_radius: positive(oracle, "WanderRad")?,
            wander_distance: non_negative(oracle, "WanderDist")?,
            wander_jitter_per_sec: non_negative(oracle, "WanderJitterPerSec")?,
            view_distance: non_negative(oracle, "ViewDistance")?,
            wall_detection_feeler_length: positive(oracle, "WallDetectionFeelerLength")?,
        })
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            seek_weight: 1.0,
            arrive_weight: 1.0,
            wander_weight: 1.0,
            separation_weight: 10.0,
            wall_avoidance_weight: 10.0,
            wander_radius: 1.2,
            wander_distance: 2.0,
            wander_jitter_per_sec: 40.0,
            view_distance: 15.0,
            wall_detection_feeler_length: 25.0,
        }
    }
}

/// Projectile flight and damage parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpec {
    /// Distance per update.
    pub max_speed: f64,
    pub damage: u32,
}

/// Parameters of one weapon type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    pub kind: WeaponType,
    /// Shots per second.
    pub firing_freq: f64,
    pub ideal_range: f64,
    /// `None` for unlimited ammunition.
    pub max_rounds: Option<u32>,
    pub default_rounds: u32,
    pub sound_range: f64,
    pub projectile: ProjectileSpec,
}

impl WeaponSpec {
    fn from_oracle(
        oracle: &dyn TunablesOracle,
        kind: WeaponType,
        projectile_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let prefix = kind.tunable_prefix();
        let (max_rounds, default_rounds) = match kind {
            WeaponType::Blaster => (None, 0),
            _ => (
                Some(count(oracle, &format!("{prefix}_MaxRoundsCarried"))?),
                count(oracle, &format!("{prefix}_DefaultRounds"))?,
            ),
        };

        Ok(Self {
            kind,
            firing_freq: positive(oracle, &format!("{prefix}_FiringFreq"))?,
            ideal_range: positive(oracle, &format!("{prefix}_IdealRange"))?,
            max_rounds,
            default_rounds,
            sound_range: non_negative(oracle, &format!("{prefix}_SoundRange"))?,
            projectile: ProjectileSpec {
                max_speed: positive(oracle, &format!("{projectile_prefix}_MaxSpeed"))?,
                damage: count(oracle, &format!("{projectile_prefix}_Damage"))?,
            },
        })
    }
}

/// Grenade projectile parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrenadeConfig {
    pub damage: u32,
    pub scale: f64,
    pub max_speed: f64,
    pub mass: f64,
    pub max_force: f64,
    pub time_before_explosion: f64,
    pub blast_radius: f64,
    /// Growth of the blast circle per update once exploded.
    pub explosion_decay_rate: f64,
}

impl GrenadeConfig {
    pub fn from_oracle(oracle: &dyn TunablesOracle) -> Result<Self, ConfigError> {
        Ok(Self {
            damage: count(oracle, "Grenade_Damage")?,
            scale: positive(oracle, "Grenade_Scale")?,
            max_speed: positive(oracle, "Grenade_MaxSpeed")?,
            mass: positive(oracle, "Grenade_Mass")?,
            max_force: positive(oracle, "Grenade_MaxForce")?,
            time_before_explosion: non_negative(oracle, "Grenade_TimeBeforeExplosion")?,
            blast_radius: positive(oracle, "Grenade_BlastRadius")?,
            // Grenades share the rocket's explosion animation rate.
            explosion_decay_rate: positive(oracle, "Rocket_ExplosionDecayRate")?,
        })
    }
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            damage: 15,
            scale: 1.0,
            max_speed: 3.0,
            mass: 1.0,
            max_force: 1.0,
            time_before_explosion: 1.5,
            blast_radius: 30.0,
            explosion_decay_rate: 2.0,
        }
    }
}

/// Every weapon's parameters plus the extras specific to a few of them.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponConfig {
    pub blaster: WeaponSpec,
    pub shotgun: WeaponSpec,
    pub rail_gun: WeaponSpec,
    pub rocket_launcher: WeaponSpec,
    pub grenade_launcher: WeaponSpec,
    pub shotgun_pellets: u32,
    /// Maximum angular deviation of a pellet, radians.
    pub shotgun_spread: f64,
    pub rocket_blast_radius: f64,
    pub rocket_explosion_decay_rate: f64,
    pub grenade: GrenadeConfig,
}

impl WeaponConfig {
    pub fn from_oracle(oracle: &dyn TunablesOracle) -> Result<Self, ConfigError> {
        let grenade = GrenadeConfig::from_oracle(oracle)?;
        let mut grenade_launcher =
            WeaponSpec::from_oracle(oracle, WeaponType::GrenadeLauncher, "Grenade")?;
        grenade_launcher.projectile = ProjectileSpec {
            max_speed: grenade.max_speed,
            damage: grenade.damage,
        };

        Ok(Self {
            blaster: WeaponSpec::from_oracle(oracle, WeaponType::Blaster, "Bolt")?,
            shotgun: WeaponSpec::from_oracle(oracle, WeaponType::Shotgun, "Pellet")?,
            rail_gun: WeaponSpec::from_oracle(oracle, WeaponType::RailGun, "Slug")?,
            rocket_launcher: WeaponSpec::from_oracle(oracle, WeaponType::RocketLauncher, "Rocket")?,
            grenade_launcher,
            shotgun_pellets: count(oracle, "Shotgun_NumBallsInShell")?.max(1),
            shotgun_spread: non_negative(oracle, "Shotgun_Spread")?,
            rocket_blast_radius: positive(oracle, "Rocket_BlastRadius")?,
            rocket_explosion_decay_rate: positive(oracle, "Rocket_ExplosionDecayRate")?,
            grenade,
        })
    }

    pub fn spec(&self, kind: WeaponType) -> &WeaponSpec {
        match kind {
            WeaponType::Blaster => &self.blaster,
            WeaponType::Shotgun => &self.shotgun,
            WeaponType::RailGun => &self.rail_gun,
            WeaponType::RocketLauncher => &self.rocket_launcher,
            WeaponType::GrenadeLauncher => &self.grenade_launcher,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        let grenade = GrenadeConfig::default();
        Self {
            blaster: WeaponSpec {
                kind: WeaponType::Blaster,
                firing_freq: 3.0,
                ideal_range: 50.0,
                max_rounds: None,
                default_rounds: 0,
                sound_range: 100.0,
                projectile: ProjectileSpec {
                    max_speed: 5.0,
                    damage: 1,
                },
            },
            shotgun: WeaponSpec {
                kind: WeaponType::Shotgun,
                firing_freq: 1.0,
                ideal_range: 100.0,
                max_rounds: Some(50),
                default_rounds: 15,
                sound_range: 400.0,
                projectile: ProjectileSpec {
                    max_speed: 6.0,
                    damage: 1,
                },
            },
            rail_gun: WeaponSpec {
                kind: WeaponType::RailGun,
                firing_freq: 1.0,
                ideal_range: 200.0,
                max_rounds: Some(50),
                default_rounds: 15,
                sound_range: 400.0,
                projectile: ProjectileSpec {
                    max_speed: 50.0,
                    damage: 10,
                },
            },
            rocket_launcher: WeaponSpec {
                kind: WeaponType::RocketLauncher,
                firing_freq: 1.5,
                ideal_range: 150.0,
                max_rounds: Some(50),
                default_rounds: 15,
                sound_range: 400.0,
                projectile: ProjectileSpec {
                    max_speed: 3.0,
                    damage: 10,
                },
            },
            grenade_launcher: WeaponSpec {
                kind: WeaponType::GrenadeLauncher,
                firing_freq: 1.0,
                ideal_range: 120.0,
                max_rounds: Some(30),
                default_rounds: 10,
                sound_range: 300.0,
                projectile: ProjectileSpec {
                    max_speed: grenade.max_speed,
                    damage: grenade.damage,
                },
            },
            shotgun_pellets: 10,
            shotgun_spread: 0.05,
            rocket_blast_radius: 20.0,
            rocket_explosion_decay_rate: 2.0,
            grenade,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn missing_bot_tunable_aborts_construction() {
        let mut tunables: BTreeMap<String, f64> = BTreeMap::new();
        tunables.insert("Bot_MaxHealth".into(), 100.0);

        let error = BotConfig::from_oracle(&tunables).unwrap_err();
        assert!(matches!(error, ConfigError::MissingConstant { .. }));
    }

    #[test]
    fn non_positive_health_is_rejected() {
        let mut tunables: BTreeMap<String, f64> = BTreeMap::new();
        tunables.insert("Bot_MaxHealth".into(), 0.0);

        let error = BotConfig::from_oracle(&tunables).unwrap_err();
        assert!(matches!(error, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn spec_lookup_matches_weapon_kind() {
        let config = WeaponConfig::default();
        for kind in [
            WeaponType::Blaster,
            WeaponType::Shotgun,
            WeaponType::RailGun,
            WeaponType::RocketLauncher,
            WeaponType::GrenadeLauncher,
        ] {
            assert_eq!(config.spec(kind).kind, kind);
        }
        assert_eq!(config.blaster.max_rounds, None);
    }
}
