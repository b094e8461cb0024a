use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::{BotConfig, WeaponConfig};
use crate::env::{BotSnapshot, WorldView};
use crate::math::Vector2D;
use crate::messaging::{MessageKind, Outbox, Payload, Telegram};
use crate::regulator::Regulator;
use crate::types::{BotStatus, EntityId, Team, WeaponType};

use super::{
    Motion, Observer, PathPlanner, SensoryMemory, Steering, TargetingSystem, WeaponSystem,
};

/// Distance within which a bot counts as standing on a position.
const POSITION_TOLERANCE: f64 = 10.0;

/// Rate limiters for the periodic subsystems.
#[derive(Clone, Debug)]
pub struct BotRegulators {
    pub weapon_selection: Regulator,
    pub goal_arbitration: Regulator,
    pub target_selection: Regulator,
    pub trigger_test: Regulator,
    pub vision_update: Regulator,
}

impl BotRegulators {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            weapon_selection: Regulator::new(config.weapon_selection_frequency),
            goal_arbitration: Regulator::new(config.goal_appraisal_frequency),
            target_selection: Regulator::new(config.targeting_frequency),
            trigger_test: Regulator::new(config.trigger_frequency),
            vision_update: Regulator::new(config.vision_frequency),
        }
    }
}

/// Everything a bot owns apart from its brain.
///
/// Goals borrow the body mutably while the brain that holds them is borrowed
/// separately, so the two live side by side in [`super::Bot`].
#[derive(Clone, Debug)]
pub struct BotBody {
    id: EntityId,
    team: Team,
    status: BotStatus,
    /// May drop below zero internally; [`health`](Self::health) clamps.
    health: i32,
    score: u32,
    possessed: bool,
    leader: bool,
    team_target: Option<EntityId>,
    hit: bool,
    hit_flash_remaining: i32,
    motion: Motion,
    steering: Steering,
    planner: PathPlanner,
    targeting: TargetingSystem,
    weapons: WeaponSystem,
    memory: SensoryMemory,
    regulators: BotRegulators,
    config: Arc<BotConfig>,
    rng: StdRng,
}

impl BotBody {
    pub fn new(
        id: EntityId,
        team: Team,
        config: Arc<BotConfig>,
        weapon_config: Arc<WeaponConfig>,
        seed: u64,
    ) -> Self {
        Self {
            id,
            team,
            status: BotStatus::Spawning,
            health: config.max_health,
            score: 0,
            possessed: false,
            leader: false,
            team_target: None,
            hit: false,
            hit_flash_remaining: config.hit_flash_frames(),
            motion: Motion::new(Vector2D::ZERO, &config),
            steering: Steering::new(config.steering.clone()),
            planner: PathPlanner::new(),
            targeting: TargetingSystem::new(),
            weapons: WeaponSystem::new(
                weapon_config,
                config.reaction_time,
                config.aim_accuracy,
                config.aim_persistence,
            ),
            memory: SensoryMemory::new(config.memory_span),
            regulators: BotRegulators::new(&config),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn status(&self) -> BotStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == BotStatus::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.status == BotStatus::Dead
    }

    pub fn is_spawning(&self) -> bool {
        self.status == BotStatus::Spawning
    }

    pub fn set_alive(&mut self) {
        self.status = BotStatus::Alive;
    }

    pub fn set_dead(&mut self) {
        self.status = BotStatus::Dead;
    }

    pub fn set_spawning(&mut self) {
        self.status = BotStatus::Spawning;
    }

    /// Current health, never negative.
    pub fn health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn max_health(&self) -> i32 {
        self.config.max_health
    }

    pub fn restore_health_to_maximum(&mut self) {
        self.health = self.config.max_health;
    }

    pub fn increase_health(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self
            .health
            .max(0)
            .saturating_add(amount)
            .min(self.config.max_health);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
    }

    pub fn is_possessed(&self) -> bool {
        self.possessed
    }

    pub(super) fn set_possessed(&mut self, possessed: bool) {
        self.possessed = possessed;
    }

    pub fn is_leader(&self) -> bool {
        self.leader
    }

    pub fn set_leader(&mut self, leader: bool) {
        self.leader = leader;
    }

    pub fn team_target(&self) -> Option<EntityId> {
        self.team_target
    }

    pub fn set_team_target(&mut self, target: Option<EntityId>) {
        self.team_target = target;
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn hit_flash_remaining(&self) -> i32 {
        self.hit_flash_remaining
    }

    /// Counts one displayed frame off the hit flash.
    pub fn advance_hit_flash(&mut self) {
        if !self.hit {
            return;
        }
        self.hit_flash_remaining -= 1;
        if self.hit_flash_remaining <= 0 {
            self.hit = false;
        }
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    pub fn position(&self) -> Vector2D {
        self.motion.position
    }

    pub fn set_position(&mut self, position: Vector2D) {
        self.motion.position = position;
    }

    pub fn facing(&self) -> Vector2D {
        self.motion.facing
    }

    pub fn bounding_radius(&self) -> f64 {
        self.motion.bounding_radius
    }

    pub fn steering(&self) -> &Steering {
        &self.steering
    }

    pub fn steering_mut(&mut self) -> &mut Steering {
        &mut self.steering
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut PathPlanner {
        &mut self.planner
    }

    pub fn targeting(&self) -> &TargetingSystem {
        &self.targeting
    }

    pub fn targeting_mut(&mut self) -> &mut TargetingSystem {
        &mut self.targeting
    }

    pub fn weapons(&self) -> &WeaponSystem {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponSystem {
        &mut self.weapons
    }

    pub fn memory(&self) -> &SensoryMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SensoryMemory {
        &mut self.memory
    }

    pub fn regulators_mut(&mut self) -> &mut BotRegulators {
        &mut self.regulators
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn snapshot(&self) -> BotSnapshot {
        BotSnapshot {
            id: self.id,
            team: self.team,
            status: self.status,
            position: self.motion.position,
            velocity: self.motion.velocity,
            facing: self.motion.facing,
            bounding_radius: self.motion.bounding_radius,
            health: self.health(),
        }
    }

    pub fn observer(&self) -> Observer {
        Observer {
            id: self.id,
            team: self.team,
            position: self.motion.position,
            facing: self.motion.facing,
            field_of_view: self.config.field_of_view,
        }
    }

    /// Subtracts `amount` from health and returns `true` if this killed the bot.
    ///
    /// Death side effects only run on the transition into the dead state. In
    /// team games the dying bot hands every loadout weapon it was not carrying
    /// to its team's caches.
    pub fn reduce_health(
        &mut self,
        amount: u32,
        view: &dyn WorldView,
        outbox: &mut Outbox,
    ) -> bool {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);

        let killed = self.health <= 0 && !self.is_dead();
        if killed {
            self.set_dead();
            debug!(target: "raven::bot", bot = %self.id, "bot died");

            if view.is_team_mode() {
                self.drop_missing_loadout(view, outbox);
            }
        }

        self.hit = true;
        self.hit_flash_remaining = self.config.hit_flash_frames();
        killed
    }

    fn drop_missing_loadout(&self, view: &dyn WorldView, outbox: &mut Outbox) {
        let missing: Vec<WeaponType> = WeaponType::TEAM_LOADOUT
            .into_iter()
            .filter(|kind| self.weapons.get_weapon_from_inventory(*kind).is_none())
            .collect();

        for cache in view
            .weapon_caches()
            .into_iter()
            .filter(|cache| cache.team == self.team)
        {
            for kind in &missing {
                outbox.send_now(
                    self.id,
                    cache.id,
                    MessageKind::DepositWeapon,
                    Payload::Weapon(*kind),
                );
            }
        }
    }

    /// Integrates one update worth of steering.
    pub fn update_movement(&mut self, view: &dyn WorldView, dt: f64) {
        let force = self
            .steering
            .calculate(self.id, &self.motion, view, &mut self.rng, dt);
        self.motion.integrate(force);
    }

    pub fn rotate_facing_toward_position(&mut self, target: Vector2D) -> bool {
        self.motion.rotate_facing_toward(target)
    }

    pub fn is_at_position(&self, position: Vector2D) -> bool {
        self.motion.position.distance_sq(position) < POSITION_TOLERANCE * POSITION_TOLERANCE
    }

    pub fn has_los_to(&self, position: Vector2D, view: &dyn WorldView) -> bool {
        view.is_los_okay(self.motion.position, position)
    }

    pub fn can_walk_to(&self, position: Vector2D, view: &dyn WorldView) -> bool {
        !view.is_path_obstructed(self.motion.position, position, self.motion.bounding_radius)
    }

    pub fn can_walk_between(&self, from: Vector2D, to: Vector2D, view: &dyn WorldView) -> bool {
        !view.is_path_obstructed(from, to, self.motion.bounding_radius)
    }

    fn step(&self, direction: Vector2D, view: &dyn WorldView) -> Option<Vector2D> {
        let radius = self.motion.bounding_radius;
        let position = self.motion.position + direction * (radius * 2.0) + direction * radius;
        self.can_walk_to(position, view).then_some(position)
    }

    /// Position of a sidestep to the left, if the way is clear.
    pub fn can_step_left(&self, view: &dyn WorldView) -> Option<Vector2D> {
        self.step(-self.motion.facing.perp(), view)
    }

    pub fn can_step_right(&self, view: &dyn WorldView) -> Option<Vector2D> {
        self.step(self.motion.facing.perp(), view)
    }

    pub fn can_step_forward(&self, view: &dyn WorldView) -> Option<Vector2D> {
        self.step(self.motion.facing, view)
    }

    pub fn can_step_backward(&self, view: &dyn WorldView) -> Option<Vector2D> {
        self.step(-self.motion.facing, view)
    }

    /// Seconds needed to cover the straight-line distance at full speed.
    pub fn time_to_reach_position(&self, position: Vector2D) -> f64 {
        self.motion.position.distance(position) / (self.motion.max_speed * self.config.frame_rate)
    }

    pub fn request_path_to_position(
        &mut self,
        target: Vector2D,
        view: &dyn WorldView,
        outbox: &mut Outbox,
    ) -> bool {
        self.planner.request_path_to_position(
            self.id,
            self.motion.position,
            self.motion.bounding_radius,
            target,
            view,
            outbox,
        )
    }

    pub fn random_destination(&mut self, view: &dyn WorldView) -> Vector2D {
        self.planner.random_destination(
            self.motion.position,
            self.motion.bounding_radius,
            view,
            &mut self.rng,
        )
    }

    pub fn target_snapshot(&self, view: &dyn WorldView) -> Option<BotSnapshot> {
        self.targeting
            .target()
            .and_then(|target| view.bot(target))
            .filter(BotSnapshot::is_alive)
    }

    pub fn is_target_shootable(&self) -> bool {
        self.targeting.is_target_shootable(&self.memory)
    }

    pub fn is_target_within_fov(&self) -> bool {
        self.targeting.is_target_within_fov(&self.memory)
    }

    /// Re-selects the target. A team leader that changes target tells its
    /// teammates.
    pub fn update_targeting(&mut self, view: &dyn WorldView, now: f64, outbox: &mut Outbox) {
        let changed =
            self.targeting
                .update(self.motion.position, &self.memory, self.team_target, view, now);
        if !changed || !self.leader || !view.is_team_mode() {
            return;
        }
        let Some(target) = self.targeting.target() else {
            return;
        };

        self.team_target = Some(target);
        for mate in view
            .bots()
            .into_iter()
            .filter(|bot| bot.team == self.team && bot.id != self.id)
        {
            outbox.send_now(
                self.id,
                mate.id,
                MessageKind::TeamTarget,
                Payload::Entity(target),
            );
        }
    }

    pub fn update_vision(&mut self, view: &dyn WorldView, now: f64) {
        let observer = self.observer();
        self.memory.update_vision(&observer, view, now);
    }

    pub fn select_weapon(&mut self, view: &dyn WorldView) {
        let distance = self
            .target_snapshot(view)
            .map(|target| self.motion.position.distance(target.position));
        self.weapons.select_weapon(distance);
    }

    /// Aims at the current target and fires when the facing is on target,
    /// the target has been visible for longer than the reaction time and
    /// nothing blocks the shot. Without a target the bot looks where it goes.
    pub fn take_aim_and_shoot(&mut self, view: &dyn WorldView, now: f64, outbox: &mut Outbox) {
        let position = self.motion.position;
        let engaged = self.targeting.is_target_shootable(&self.memory)
            || self.targeting.time_target_out_of_view(&self.memory, now)
                < self.weapons.aim_persistence();

        let target = if engaged {
            self.target_snapshot(view)
        } else {
            None
        };
        let Some(target) = target else {
            self.motion
                .rotate_facing_toward(position + self.motion.heading);
            return;
        };

        let aim = if self.weapons.leads_target() {
            self.weapons.predict_future_position(position, &target)
        } else {
            target.position
        };

        if self.motion.rotate_facing_toward(aim)
            && self.targeting.time_target_visible(&self.memory, now) > self.weapons.reaction_time()
            && view.is_los_okay(position, aim)
        {
            let aim = self.weapons.add_noise_to_aim(position, aim, &mut self.rng);
            self.weapons.shoot_at(
                self.id,
                position,
                self.motion.facing,
                aim,
                now,
                &mut self.rng,
                outbox,
            );
        }
    }

    /// Handles the telegrams the brain did not consume. Returns `false` for
    /// kinds a bot does not understand.
    pub fn handle_message(
        &mut self,
        telegram: &Telegram,
        view: &dyn WorldView,
        now: f64,
        outbox: &mut Outbox,
    ) -> bool {
        match telegram.kind {
            MessageKind::Damage => {
                if self.is_dead() || self.is_spawning() {
                    return true;
                }
                let amount = telegram.payload.damage().unwrap_or(0);
                self.reduce_health(amount, view, outbox);
                if self.is_dead() {
                    outbox.send_now(self.id, telegram.sender, MessageKind::YouGotMe, Payload::None);
                }
                true
            }
            MessageKind::YouGotMe => {
                self.increment_score();
                self.targeting.clear_target();
                true
            }
            MessageKind::GunshotSound => {
                if let Some(shooter) = telegram.payload.entity().and_then(|id| view.bot(id)) {
                    let observer = self.observer();
                    self.memory
                        .update_with_sound_source(&observer, &shooter, view, now);
                }
                true
            }
            MessageKind::UserHasRemovedBot => {
                if let Some(removed) = telegram.payload.entity() {
                    self.memory.remove_bot_from_memory(removed);
                    if self.targeting.target() == Some(removed) {
                        self.targeting.clear_target();
                    }
                    if self.team_target == Some(removed) {
                        self.team_target = None;
                    }
                }
                true
            }
            MessageKind::TeamTarget => {
                self.team_target = telegram.payload.entity();
                true
            }
            MessageKind::PathReady
            | MessageKind::NoPathAvailable
            | MessageKind::DepositWeapon => false,
        }
    }
}
