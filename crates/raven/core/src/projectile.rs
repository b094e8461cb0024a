//! Projectiles fired by bot weapons.
//!
//! Bolts, pellets and slugs deal their damage on contact. Rockets and
//! grenades explode and damage every live bot inside the blast circle once.
//! Grenades additionally wait for their fuse: a grenade that hits something
//! sits at the impact point until the fuse runs out, and touching a bot only
//! tells that bot it was hit (zero damage).

use strum::{Display, IntoStaticStr};

use crate::config::WeaponConfig;
use crate::env::{BotSnapshot, WorldView};
use crate::math::{Vector2D, closest_wall_intersection, distance_to_segment};
use crate::messaging::{MessageKind, Outbox, Payload};
use crate::types::{EntityId, WeaponType};

/// Distance from the aimed-at position at which rockets and grenades detonate.
const TARGET_TOLERANCE: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ProjectileKind {
    Bolt,
    Pellet,
    Slug,
    Rocket,
    Grenade,
}

impl ProjectileKind {
    pub fn fired_by(weapon: WeaponType) -> Self {
        match weapon {
            WeaponType::Blaster => ProjectileKind::Bolt,
            WeaponType::Shotgun => ProjectileKind::Pellet,
            WeaponType::RailGun => ProjectileKind::Slug,
            WeaponType::RocketLauncher => ProjectileKind::Rocket,
            WeaponType::GrenadeLauncher => ProjectileKind::Grenade,
        }
    }

    pub fn weapon(self) -> WeaponType {
        match self {
            ProjectileKind::Bolt => WeaponType::Blaster,
            ProjectileKind::Pellet => WeaponType::Shotgun,
            ProjectileKind::Slug => WeaponType::RailGun,
            ProjectileKind::Rocket => WeaponType::RocketLauncher,
            ProjectileKind::Grenade => WeaponType::GrenadeLauncher,
        }
    }

    fn explodes(self) -> bool {
        matches!(self, ProjectileKind::Rocket | ProjectileKind::Grenade)
    }
}

/// Request to put a projectile into the world, emitted when a weapon fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileRequest {
    pub kind: ProjectileKind,
    pub shooter: EntityId,
    pub origin: Vector2D,
    /// Direction of travel. Falls back to `target - origin` when zero.
    pub heading: Vector2D,
    pub target: Vector2D,
}

/// Reported by [`Projectile::update`] on the tick a blast is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Explosion {
    pub projectile: EntityId,
    pub shooter: EntityId,
    pub kind: ProjectileKind,
    pub position: Vector2D,
    pub blast_radius: f64,
    pub bots_caught: usize,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    id: EntityId,
    kind: ProjectileKind,
    shooter: EntityId,
    target: Vector2D,
    position: Vector2D,
    velocity: Vector2D,
    heading: Vector2D,
    max_speed: f64,
    bounding_radius: f64,
    damage: u32,
    /// Maximum blast radius, zero for non-explosive kinds.
    blast_radius: f64,
    current_blast_radius: f64,
    decay_rate: f64,
    /// Grenade fuse. Other kinds detonate as soon as they impact.
    explosion_time: Option<f64>,
    impact_point: Option<Vector2D>,
    impacted: bool,
    exploded: bool,
    dead: bool,
}

impl Projectile {
    pub fn new(id: EntityId, request: ProjectileRequest, now: f64, config: &WeaponConfig) -> Self {
        let spec = config.spec(request.kind.weapon()).projectile;
        let heading = if request.heading.is_zero() {
            (request.target - request.origin).normalized()
        } else {
            request.heading.normalized()
        };

        let (bounding_radius, blast_radius, decay_rate, explosion_time) = match request.kind {
            ProjectileKind::Grenade => (
                config.grenade.scale,
                config.grenade.blast_radius,
                config.grenade.explosion_decay_rate,
                Some(now + config.grenade.time_before_explosion),
            ),
            ProjectileKind::Rocket => (
                1.0,
                config.rocket_blast_radius,
                config.rocket_explosion_decay_rate,
                None,
            ),
            _ => (1.0, 0.0, 0.0, None),
        };

        Self {
            id,
            kind: request.kind,
            shooter: request.shooter,
            target: request.target,
            position: request.origin,
            velocity: Vector2D::ZERO,
            heading,
            max_speed: spec.max_speed,
            bounding_radius,
            damage: spec.damage,
            blast_radius,
            current_blast_radius: 0.0,
            decay_rate,
            explosion_time,
            impact_point: None,
            impacted: false,
            exploded: false,
            dead: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn shooter(&self) -> EntityId {
        self.shooter
    }

    pub fn target(&self) -> Vector2D {
        self.target
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn bounding_radius(&self) -> f64 {
        self.bounding_radius
    }

    pub fn impact_point(&self) -> Option<Vector2D> {
        self.impact_point
    }

    pub fn has_impacted(&self) -> bool {
        self.impacted
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn current_blast_radius(&self) -> f64 {
        self.current_blast_radius
    }

    /// Advances the projectile by one update.
    ///
    /// Damage is dispatched through `outbox` with the shooter as sender so
    /// kill confirmations reach the right bot.
    pub fn update(
        &mut self,
        now: f64,
        view: &dyn WorldView,
        outbox: &mut Outbox,
    ) -> Option<Explosion> {
        if self.dead {
            return None;
        }

        if !self.impacted {
            self.velocity = (self.heading * self.max_speed).truncated(self.max_speed);
            self.position += self.velocity;

            match self.kind {
                ProjectileKind::Bolt | ProjectileKind::Pellet => self.test_direct_hit(view, outbox),
                ProjectileKind::Slug => self.test_penetrating_hit(view, outbox),
                ProjectileKind::Rocket | ProjectileKind::Grenade => {
                    self.test_explosive_impact(view, outbox)
                }
            }

            if !self.impacted && !view.contains(self.position) {
                self.dead = true;
                return None;
            }

            if let Some(fuse) = self.explosion_time
                && now >= fuse
            {
                self.impacted = true;
            }
        }

        if !self.impacted || !self.kind.explodes() {
            return None;
        }
        if let Some(fuse) = self.explosion_time
            && now < fuse
        {
            return None;
        }

        let explosion = if self.exploded {
            None
        } else {
            self.exploded = true;
            let caught = self.inflict_blast_damage(view, outbox);
            Some(Explosion {
                projectile: self.id,
                shooter: self.shooter,
                kind: self.kind,
                position: self.position,
                blast_radius: self.blast_radius,
                bots_caught: caught,
            })
        };

        self.current_blast_radius += self.decay_rate;
        if self.current_blast_radius > self.blast_radius {
            self.dead = true;
        }

        explosion
    }

    fn previous_position(&self) -> Vector2D {
        self.position - self.velocity
    }

    fn closest_intersecting_bot(&self, view: &dyn WorldView) -> Option<BotSnapshot> {
        let from = self.previous_position();
        self.bots_on_segment(view)
            .into_iter()
            .min_by(|a, b| {
                from.distance_sq(a.position)
                    .total_cmp(&from.distance_sq(b.position))
            })
    }

    fn bots_on_segment(&self, view: &dyn WorldView) -> Vec<BotSnapshot> {
        let (from, to) = (self.previous_position(), self.position);
        view.bots()
            .into_iter()
            .filter(|bot| bot.is_alive() && bot.id != self.shooter)
            .filter(|bot| distance_to_segment(bot.position, from, to) < bot.bounding_radius)
            .collect()
    }

    fn wall_impact(&self, view: &dyn WorldView) -> Option<Vector2D> {
        closest_wall_intersection(self.previous_position(), self.position, view.walls())
            .map(|(_, point)| point)
    }

    fn send_damage(&self, receiver: EntityId, amount: u32, outbox: &mut Outbox) {
        outbox.send_now(
            self.shooter,
            receiver,
            MessageKind::Damage,
            Payload::Damage(amount),
        );
    }

    fn test_direct_hit(&mut self, view: &dyn WorldView, outbox: &mut Outbox) {
        let wall = self.wall_impact(view);
        if let Some(bot) = self.closest_intersecting_bot(view) {
            let wall_first = wall.is_some_and(|point| {
                self.previous_position().distance_sq(point)
                    < self.previous_position().distance_sq(bot.position)
            });
            if !wall_first {
                self.send_damage(bot.id, self.damage, outbox);
                self.impact_point = Some(self.position);
                self.impacted = true;
                self.dead = true;
                return;
            }
        }

        if let Some(point) = wall {
            self.position = point;
            self.impact_point = Some(point);
            self.impacted = true;
            self.dead = true;
        }
    }

    fn test_penetrating_hit(&mut self, view: &dyn WorldView, outbox: &mut Outbox) {
        let from = self.previous_position();
        let wall = self.wall_impact(view);
        let reach = wall.map_or(f64::INFINITY, |point| from.distance_sq(point));

        for bot in self.bots_on_segment(view) {
            if from.distance_sq(bot.position) <= reach {
                self.send_damage(bot.id, self.damage, outbox);
            }
        }

        if let Some(point) = wall {
            self.position = point;
            self.impact_point = Some(point);
            self.impacted = true;
            self.dead = true;
        }
    }

    fn test_explosive_impact(&mut self, view: &dyn WorldView, outbox: &mut Outbox) {
        if let Some(bot) = self.closest_intersecting_bot(view) {
            self.impacted = true;
            let contact_damage = match self.kind {
                ProjectileKind::Grenade => 0,
                _ => self.damage,
            };
            self.send_damage(bot.id, contact_damage, outbox);
        }

        if let Some(point) = self.wall_impact(view) {
            self.impacted = true;
            self.position = point;
        }

        if self.position.distance_sq(self.target) < TARGET_TOLERANCE * TARGET_TOLERANCE {
            self.impacted = true;
        }

        if self.impacted {
            self.impact_point = Some(self.position);
        }
    }

    fn inflict_blast_damage(&self, view: &dyn WorldView, outbox: &mut Outbox) -> usize {
        let mut caught = 0;
        for bot in view.bots().into_iter().filter(BotSnapshot::is_alive) {
            if self.position.distance(bot.position) < self.blast_radius + bot.bounding_radius {
                self.send_damage(bot.id, self.damage, outbox);
                caught += 1;
            }
        }
        caught
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticView;

    fn request(kind: ProjectileKind, target: Vector2D) -> ProjectileRequest {
        ProjectileRequest {
            kind,
            shooter: EntityId(1),
            origin: Vector2D::new(100.0, 100.0),
            heading: Vector2D::ZERO,
            target,
        }
    }

    fn damage_messages(outbox: &Outbox) -> Vec<(EntityId, u32)> {
        outbox
            .messages()
            .iter()
            .filter(|message| message.kind == MessageKind::Damage)
            .map(|message| (message.receiver, message.payload.damage().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn bolt_damages_first_bot_on_its_path() {
        let config = WeaponConfig::default();
        let view = StaticView::default()
            .with_bot(1, Vector2D::new(100.0, 100.0))
            .with_bot(2, Vector2D::new(104.0, 100.0))
            .with_bot(3, Vector2D::new(107.0, 100.0));
        let mut bolt = Projectile::new(
            EntityId(10),
            request(ProjectileKind::Bolt, Vector2D::new(200.0, 100.0)),
            0.0,
            &config,
        );
        let mut outbox = Outbox::new();

        bolt.update(0.1, &view, &mut outbox);

        assert!(bolt.is_dead());
        assert_eq!(damage_messages(&outbox), vec![(EntityId(2), 1)]);
    }

    #[test]
    fn projectiles_die_outside_the_arena() {
        let config = WeaponConfig::default();
        let mut view = StaticView::default();
        view.extent = Vector2D::new(102.0, 102.0);
        let mut bolt = Projectile::new(
            EntityId(10),
            request(ProjectileKind::Bolt, Vector2D::new(200.0, 100.0)),
            0.0,
            &config,
        );
        let mut outbox = Outbox::new();

        bolt.update(0.1, &view, &mut outbox);
        assert!(bolt.is_dead());
        assert!(outbox.is_empty());
    }

    #[test]
    fn grenade_contact_is_harmless_and_blast_applies_once() {
        let config = WeaponConfig::default();
        // Bot 2 sits in the flight path, bot 3 inside the blast, bot 4 outside.
        let view = StaticView::default()
            .with_bot(2, Vector2D::new(103.0, 100.0))
            .with_bot(3, Vector2D::new(103.0, 125.0))
            .with_bot(4, Vector2D::new(103.0, 150.0));
        let mut grenade = Projectile::new(
            EntityId(10),
            request(ProjectileKind::Grenade, Vector2D::new(300.0, 100.0)),
            0.0,
            &config,
        );
        let mut outbox = Outbox::new();

        assert!(grenade.update(0.1, &view, &mut outbox).is_none());
        assert!(grenade.has_impacted());
        assert_eq!(damage_messages(&outbox), vec![(EntityId(2), 0)]);

        let mut outbox = Outbox::new();
        assert!(grenade.update(1.0, &view, &mut outbox).is_none());
        assert!(outbox.is_empty(), "fuse has not run out yet");

        let mut outbox = Outbox::new();
        let explosion = grenade.update(1.5, &view, &mut outbox).expect("fuse elapsed");
        assert_eq!(explosion.bots_caught, 2);
        assert_eq!(
            damage_messages(&outbox),
            vec![(EntityId(2), 15), (EntityId(3), 15)]
        );

        let mut updates = 0;
        while !grenade.is_dead() {
            let mut outbox = Outbox::new();
            assert!(grenade.update(1.6, &view, &mut outbox).is_none());
            assert!(outbox.is_empty());
            updates += 1;
        }
        assert!(grenade.current_blast_radius() > 30.0);
        assert_eq!(updates, 15);
    }

    #[test]
    fn grenade_snaps_to_wall_impact_point() {
        let config = WeaponConfig::default();
        let view = StaticView::default()
            .with_wall(Vector2D::new(102.0, 0.0), Vector2D::new(102.0, 200.0));
        let mut grenade = Projectile::new(
            EntityId(10),
            request(ProjectileKind::Grenade, Vector2D::new(300.0, 100.0)),
            0.0,
            &config,
        );
        let mut outbox = Outbox::new();

        grenade.update(0.1, &view, &mut outbox);
        assert!(grenade.has_impacted());
        assert!((grenade.position().x - 102.0).abs() < 1e-9);
    }

    #[test]
    fn rocket_explodes_on_reaching_its_target() {
        let config = WeaponConfig::default();
        let view = StaticView::default().with_bot(5, Vector2D::new(120.0, 100.0));
        let mut rocket = Projectile::new(
            EntityId(10),
            request(ProjectileKind::Rocket, Vector2D::new(106.0, 100.0)),
            0.0,
            &config,
        );
        let mut outbox = Outbox::new();

        let explosion = rocket.update(0.1, &view, &mut outbox).expect("within tolerance");
        assert_eq!(explosion.position, Vector2D::new(103.0, 100.0));
        assert_eq!(damage_messages(&outbox), vec![(EntityId(5), 10)]);
    }
}
