//! Weapon inventory, selection and firing.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use crate::config::{WeaponConfig, WeaponSpec};
use crate::env::BotSnapshot;
use crate::math::Vector2D;
use crate::messaging::Outbox;
use crate::projectile::{ProjectileKind, ProjectileRequest};
use crate::types::{EntityId, WeaponType};

/// Ammunition factor credited to weapons that never run dry.
const UNLIMITED_AMMO_FACTOR: f64 = 0.6;

/// Share of the carrying capacity at which ammunition stops limiting desirability.
const COMFORTABLE_AMMO_SHARE: f64 = 0.3;

/// Weapon strength credited for the blaster alone.
const BASE_WEAPON_STRENGTH: f64 = 0.1;

/// One held weapon.
#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    spec: WeaponSpec,
    /// `None` for unlimited ammunition.
    rounds: Option<u32>,
    next_shot_time: f64,
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            rounds: spec.max_rounds.map(|_| spec.default_rounds),
            next_shot_time: f64::NEG_INFINITY,
        }
    }

    pub fn kind(&self) -> WeaponType {
        self.spec.kind
    }

    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    pub fn rounds_left(&self) -> Option<u32> {
        self.rounds
    }

    pub fn has_ammo(&self) -> bool {
        self.rounds.is_none_or(|rounds| rounds > 0)
    }

    pub fn is_ready_for_next_shot(&self, now: f64) -> bool {
        now >= self.next_shot_time
    }

    /// Adds rounds up to the carrying capacity.
    pub fn increment_rounds(&mut self, amount: u32) {
        if let (Some(rounds), Some(max)) = (self.rounds.as_mut(), self.spec.max_rounds) {
            *rounds = rounds.saturating_add(amount).min(max);
        }
    }

    /// How suitable the weapon is against a target `distance` away, in `[0, 1]`.
    pub fn desirability(&self, distance: f64) -> f64 {
        if !self.has_ammo() {
            return 0.0;
        }
        let ideal = self.spec.ideal_range;
        let range_fit = 1.0 / (1.0 + (distance - ideal).abs() / ideal);
        let ammo = match (self.rounds, self.spec.max_rounds) {
            (Some(rounds), Some(max)) if max > 0 => {
                (f64::from(rounds) / (COMFORTABLE_AMMO_SHARE * f64::from(max))).min(1.0)
            }
            (Some(_), _) => 0.0,
            (None, _) => UNLIMITED_AMMO_FACTOR,
        };
        range_fit * ammo
    }

    fn consume_shot(&mut self, now: f64) {
        if let Some(rounds) = self.rounds.as_mut() {
            *rounds = rounds.saturating_sub(1);
        }
        self.next_shot_time = now + 1.0 / self.spec.firing_freq;
    }
}

#[derive(Clone, Debug)]
pub struct WeaponSystem {
    config: Arc<WeaponConfig>,
    inventory: BTreeMap<WeaponType, Weapon>,
    current: WeaponType,
    reaction_time: f64,
    aim_accuracy: f64,
    aim_persistence: f64,
}

impl WeaponSystem {
    pub fn new(
        config: Arc<WeaponConfig>,
        reaction_time: f64,
        aim_accuracy: f64,
        aim_persistence: f64,
    ) -> Self {
        let mut system = Self {
            config,
            inventory: BTreeMap::new(),
            current: WeaponType::Blaster,
            reaction_time,
            aim_accuracy,
            aim_persistence,
        };
        system.initialize();
        system
    }

    /// Resets the inventory to a single blaster.
    pub fn initialize(&mut self) {
        self.inventory.clear();
        self.inventory
            .insert(WeaponType::Blaster, Weapon::new(self.config.blaster));
        self.current = WeaponType::Blaster;
    }

    pub fn reaction_time(&self) -> f64 {
        self.reaction_time
    }

    pub fn aim_accuracy(&self) -> f64 {
        self.aim_accuracy
    }

    pub fn aim_persistence(&self) -> f64 {
        self.aim_persistence
    }

    pub fn current_weapon(&self) -> Option<&Weapon> {
        self.inventory.get(&self.current)
    }

    pub fn current_kind(&self) -> WeaponType {
        self.current
    }

    pub fn get_weapon_from_inventory(&self, kind: WeaponType) -> Option<&Weapon> {
        self.inventory.get(&kind)
    }

    pub fn has_weapon(&self, kind: WeaponType) -> bool {
        self.inventory.contains_key(&kind)
    }

    pub fn held(&self) -> impl Iterator<Item = &Weapon> {
        self.inventory.values()
    }

    /// Picks up a weapon. An already held weapon only gains its default rounds.
    pub fn add_weapon(&mut self, kind: WeaponType) {
        let spec = *self.config.spec(kind);
        match self.inventory.get_mut(&kind) {
            Some(weapon) => weapon.increment_rounds(spec.default_rounds),
            None => {
                self.inventory.insert(kind, Weapon::new(spec));
            }
        }
    }

    /// Switches to `kind` if it is held.
    pub fn change_weapon(&mut self, kind: WeaponType) {
        if self.has_weapon(kind) {
            self.current = kind;
        }
    }

    /// Chooses the best weapon for a target `distance` away, or the blaster
    /// when there is no target.
    pub fn select_weapon(&mut self, distance: Option<f64>) {
        let Some(distance) = distance else {
            self.change_weapon(WeaponType::Blaster);
            return;
        };

        let best = self
            .inventory
            .values()
            .map(|weapon| (weapon.kind(), weapon.desirability(distance)))
            .fold(None::<(WeaponType, f64)>, |best, candidate| match best {
                Some((_, score)) if score >= candidate.1 => best,
                _ => Some(candidate),
            });

        if let Some((kind, _)) = best {
            self.current = kind;
        }
    }

    /// Fraction of the non-blaster carrying capacity currently loaded, with a
    /// floor for the blaster.
    pub fn total_weapon_strength(&self) -> f64 {
        let (loaded, capacity) = [
            WeaponType::Shotgun,
            WeaponType::RailGun,
            WeaponType::RocketLauncher,
            WeaponType::GrenadeLauncher,
        ]
        .into_iter()
        .fold((0.0, 0.0), |(loaded, capacity), kind| {
            let max = self.config.spec(kind).max_rounds.unwrap_or(0);
            let rounds = self
                .inventory
                .get(&kind)
                .and_then(Weapon::rounds_left)
                .unwrap_or(0);
            (loaded + f64::from(rounds), capacity + f64::from(max))
        });

        if capacity <= 0.0 {
            return BASE_WEAPON_STRENGTH;
        }
        BASE_WEAPON_STRENGTH + (1.0 - BASE_WEAPON_STRENGTH) * loaded / capacity
    }

    /// Whether the current weapon's projectiles are slow enough to lead.
    pub fn leads_target(&self) -> bool {
        matches!(
            self.current,
            WeaponType::Blaster | WeaponType::RocketLauncher | WeaponType::GrenadeLauncher
        )
    }

    /// Where `target` will be when a projectile fired from `origin` reaches it.
    pub fn predict_future_position(&self, origin: Vector2D, target: &BotSnapshot) -> Vector2D {
        let speed = self.config.spec(self.current).projectile.max_speed + target.velocity.length();
        if speed <= f64::EPSILON {
            return target.position;
        }
        let look_ahead = origin.distance(target.position) / speed;
        target.position + target.velocity * look_ahead
    }

    /// Rotates the aim around `origin` by a random angle within the bot's
    /// aim accuracy.
    pub fn add_noise_to_aim(&self, origin: Vector2D, aim: Vector2D, rng: &mut impl Rng) -> Vector2D {
        if self.aim_accuracy <= 0.0 {
            return aim;
        }
        let deviation = rng.gen_range(-self.aim_accuracy..=self.aim_accuracy);
        origin + (aim - origin).rotated(deviation)
    }

    /// Fires the current weapon at `target` if it is loaded and ready.
    ///
    /// Projectiles and the gunshot sound go to `outbox`. Returns `true` if a
    /// shot was fired.
    #[allow(clippy::too_many_arguments)]
    pub fn shoot_at(
        &mut self,
        shooter: EntityId,
        origin: Vector2D,
        facing: Vector2D,
        target: Vector2D,
        now: f64,
        rng: &mut impl Rng,
        outbox: &mut Outbox,
    ) -> bool {
        let pellets = self.config.shotgun_pellets;
        let spread = self.config.shotgun_spread;
        let Some(weapon) = self.inventory.get_mut(&self.current) else {
            return false;
        };
        if !weapon.has_ammo() || !weapon.is_ready_for_next_shot(now) {
            return false;
        }

        let kind = ProjectileKind::fired_by(weapon.kind());
        match kind {
            ProjectileKind::Pellet => {
                for _ in 0..pellets {
                    let angle = rng.gen_range(0.0..=spread) - spread / 2.0;
                    let aimed = origin + (target - origin).rotated(angle);
                    outbox.fire(ProjectileRequest {
                        kind,
                        shooter,
                        origin,
                        heading: Vector2D::ZERO,
                        target: aimed,
                    });
                }
            }
            ProjectileKind::Grenade => outbox.fire(ProjectileRequest {
                kind,
                shooter,
                origin,
                heading: facing,
                target,
            }),
            _ => outbox.fire(ProjectileRequest {
                kind,
                shooter,
                origin,
                heading: Vector2D::ZERO,
                target,
            }),
        }

        weapon.consume_shot(now);
        outbox.gunshot(shooter, origin, weapon.spec().sound_range);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn system() -> WeaponSystem {
        WeaponSystem::new(Arc::new(WeaponConfig::default()), 0.2, 0.0, 1.0)
    }

    #[test]
    fn initialize_leaves_only_the_blaster() {
        let mut weapons = system();
        weapons.add_weapon(WeaponType::RailGun);
        weapons.change_weapon(WeaponType::RailGun);

        weapons.initialize();

        assert_eq!(weapons.current_kind(), WeaponType::Blaster);
        assert!(weapons.get_weapon_from_inventory(WeaponType::RailGun).is_none());
        assert_eq!(weapons.held().count(), 1);
    }

    #[test]
    fn picking_up_a_held_weapon_adds_rounds_up_to_capacity() {
        let mut weapons = system();
        for _ in 0..5 {
            weapons.add_weapon(WeaponType::Shotgun);
        }
        let shotgun = weapons
            .get_weapon_from_inventory(WeaponType::Shotgun)
            .expect("picked up");
        assert_eq!(shotgun.rounds_left(), Some(50));
    }

    #[test]
    fn selection_prefers_weapons_suited_to_the_range() {
        let mut weapons = system();
        weapons.add_weapon(WeaponType::RailGun);

        weapons.select_weapon(Some(200.0));
        assert_eq!(weapons.current_kind(), WeaponType::RailGun);

        weapons.select_weapon(None);
        assert_eq!(weapons.current_kind(), WeaponType::Blaster);
    }

    #[test]
    fn firing_respects_the_rate_of_fire() {
        let mut weapons = system();
        let mut rng = StdRng::seed_from_u64(3);
        let mut outbox = Outbox::new();
        let origin = Vector2D::ZERO;
        let target = Vector2D::new(100.0, 0.0);

        assert!(weapons.shoot_at(EntityId(1), origin, Vector2D::UNIT_X, target, 0.0, &mut rng, &mut outbox));
        assert!(!weapons.shoot_at(EntityId(1), origin, Vector2D::UNIT_X, target, 0.2, &mut rng, &mut outbox));
        assert!(weapons.shoot_at(EntityId(1), origin, Vector2D::UNIT_X, target, 0.5, &mut rng, &mut outbox));

        assert_eq!(outbox.projectiles().len(), 2);
        assert_eq!(outbox.gunshots().len(), 2);
        assert_eq!(outbox.gunshots()[0].range, 100.0);
    }

    #[test]
    fn shotgun_fires_a_spread_of_pellets_and_uses_a_round() {
        let mut weapons = system();
        weapons.add_weapon(WeaponType::Shotgun);
        weapons.change_weapon(WeaponType::Shotgun);
        let mut rng = StdRng::seed_from_u64(3);
        let mut outbox = Outbox::new();

        weapons.shoot_at(
            EntityId(1),
            Vector2D::ZERO,
            Vector2D::UNIT_X,
            Vector2D::new(100.0, 0.0),
            0.0,
            &mut rng,
            &mut outbox,
        );

        assert_eq!(outbox.projectiles().len(), 10);
        let shotgun = weapons.current_weapon().expect("holding shotgun");
        assert_eq!(shotgun.rounds_left(), Some(14));
    }

    #[test]
    fn weapon_strength_counts_loaded_rounds() {
        let mut weapons = system();
        assert!((weapons.total_weapon_strength() - 0.1).abs() < 1e-12);

        weapons.add_weapon(WeaponType::RailGun);
        let expected = 0.1 + 0.9 * 15.0 / 180.0;
        assert!((weapons.total_weapon_strength() - expected).abs() < 1e-12);
    }
}
