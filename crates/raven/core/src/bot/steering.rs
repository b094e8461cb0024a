//! Steering behaviors combined into a single force per update.

use bitflags::bitflags;
use rand::Rng;

use crate::config::SteeringConfig;
use crate::env::WorldView;
use crate::math::{Vector2D, segment_intersection};
use crate::types::EntityId;

use super::Motion;

/// Divisor shaping the arrive deceleration curve.
const ARRIVE_DECELERATION: f64 = 2.0 * 0.3;

bitflags! {
    /// Behaviors contributing to the steering force.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Behaviors: u8 {
        const SEEK           = 1 << 0;
        const ARRIVE         = 1 << 1;
        const WANDER         = 1 << 2;
        const SEPARATION     = 1 << 3;
        const WALL_AVOIDANCE = 1 << 4;
    }
}

impl Behaviors {
    /// Behaviors switched on and off by goals.
    pub const GOAL_DRIVEN: Self = Self::SEEK.union(Self::ARRIVE).union(Self::WANDER);
}

#[derive(Clone, Debug)]
pub struct Steering {
    config: SteeringConfig,
    behaviors: Behaviors,
    target: Vector2D,
    /// Point on the wander circle, relative to the circle's center.
    wander_target: Vector2D,
    force: Vector2D,
}

impl Steering {
    pub fn new(config: SteeringConfig) -> Self {
        let wander_target = Vector2D::new(config.wander_radius, 0.0);
        Self {
            config,
            behaviors: Behaviors::empty(),
            target: Vector2D::ZERO,
            wander_target,
            force: Vector2D::ZERO,
        }
    }

    pub fn behaviors(&self) -> Behaviors {
        self.behaviors
    }

    pub fn is_on(&self, behavior: Behaviors) -> bool {
        self.behaviors.contains(behavior)
    }

    pub fn turn_on(&mut self, behaviors: Behaviors) {
        self.behaviors.insert(behaviors);
    }

    pub fn turn_off(&mut self, behaviors: Behaviors) {
        self.behaviors.remove(behaviors);
    }

    /// Switches off every goal-driven behavior, keeping separation and wall
    /// avoidance as they were.
    pub fn reset_goal_behaviors(&mut self) {
        self.behaviors.remove(Behaviors::GOAL_DRIVEN);
    }

    pub fn target(&self) -> Vector2D {
        self.target
    }

    pub fn set_target(&mut self, target: Vector2D) {
        self.target = target;
    }

    /// Force produced by the last [`calculate`](Self::calculate).
    pub fn force(&self) -> Vector2D {
        self.force
    }

    /// Weighted, truncated running sum of the active behaviors.
    ///
    /// Behaviors are accumulated in priority order until the bot's maximum
    /// force is used up.
    pub fn calculate(
        &mut self,
        owner: EntityId,
        motion: &Motion,
        view: &dyn WorldView,
        rng: &mut impl Rng,
        dt: f64,
    ) -> Vector2D {
        let mut total = Vector2D::ZERO;
        let max_force = motion.max_force;

        let mut contributions = Vec::with_capacity(5);
        if self.is_on(Behaviors::WALL_AVOIDANCE) {
            contributions
                .push(self.wall_avoidance(motion, view) * self.config.wall_avoidance_weight);
        }
        if self.is_on(Behaviors::SEPARATION) {
            contributions.push(self.separation(owner, motion, view) * self.config.separation_weight);
        }
        if self.is_on(Behaviors::SEEK) {
            contributions.push(seek(motion, self.target) * self.config.seek_weight);
        }
        if self.is_on(Behaviors::ARRIVE) {
            contributions.push(arrive(motion, self.target) * self.config.arrive_weight);
        }
        if self.is_on(Behaviors::WANDER) {
            let wander = self.wander(motion, rng, dt);
            contributions.push(wander * self.config.wander_weight);
        }

        for force in contributions {
            if !accumulate_force(&mut total, force, max_force) {
                break;
            }
        }

        self.force = total;
        total
    }

    fn wander(&mut self, motion: &Motion, rng: &mut impl Rng, dt: f64) -> Vector2D {
        let jitter = self.config.wander_jitter_per_sec * dt.max(0.0);
        self.wander_target += Vector2D::new(
            rng.gen_range(-1.0..=1.0) * jitter,
            rng.gen_range(-1.0..=1.0) * jitter,
        );
        self.wander_target = self.wander_target.normalized() * self.config.wander_radius;
        if self.wander_target.is_zero() {
            self.wander_target = Vector2D::new(self.config.wander_radius, 0.0);
        }

        let local = self.wander_target + Vector2D::new(self.config.wander_distance, 0.0);
        let world = motion.position + motion.heading * local.x + motion.side * local.y;
        world - motion.position
    }

    fn separation(&self, owner: EntityId, motion: &Motion, view: &dyn WorldView) -> Vector2D {
        let radius_sq = self.config.view_distance * self.config.view_distance;
        view.bots()
            .into_iter()
            .filter(|bot| bot.id != owner && bot.is_alive())
            .map(|bot| motion.position - bot.position)
            .filter(|away| !away.is_zero() && away.length_sq() < radius_sq)
            .fold(Vector2D::ZERO, |force, away| {
                force + away.normalized() / away.length()
            })
    }

    fn wall_avoidance(&self, motion: &Motion, view: &dyn WorldView) -> Vector2D {
        let length = self.config.wall_detection_feeler_length;
        let feelers = [
            motion.position + motion.heading * length,
            motion.position + motion.heading.rotated(std::f64::consts::FRAC_PI_4) * (length * 0.5),
            motion.position + motion.heading.rotated(-std::f64::consts::FRAC_PI_4) * (length * 0.5),
        ];

        let mut strongest = Vector2D::ZERO;
        for feeler in feelers {
            let closest = view
                .walls()
                .iter()
                .filter_map(|wall| {
                    segment_intersection(motion.position, feeler, wall.from, wall.to)
                        .map(|(fraction, point)| (fraction, point, wall.normal))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));

            if let Some((_, point, normal)) = closest {
                let overshoot = feeler - point;
                let push = normal * overshoot.length();
                if push.length_sq() > strongest.length_sq() {
                    strongest = push;
                }
            }
        }
        strongest
    }
}

fn seek(motion: &Motion, target: Vector2D) -> Vector2D {
    let desired = (target - motion.position).normalized() * motion.max_speed;
    desired - motion.velocity
}

fn arrive(motion: &Motion, target: Vector2D) -> Vector2D {
    let to_target = target - motion.position;
    let distance = to_target.length();
    if distance <= f64::EPSILON {
        return Vector2D::ZERO;
    }
    let speed = (distance / ARRIVE_DECELERATION).min(motion.max_speed);
    to_target * (speed / distance) - motion.velocity
}

/// Adds as much of `force` to `total` as the remaining budget allows.
///
/// Returns `false` once the budget is exhausted.
fn accumulate_force(total: &mut Vector2D, force: Vector2D, max_force: f64) -> bool {
    let remaining = max_force - total.length();
    if remaining <= 0.0 {
        return false;
    }
    if force.length() < remaining {
        *total += force;
    } else {
        *total += force.normalized() * remaining;
    }
    true
}
