use crate::config::BotConfig;
use crate::math::Vector2D;

/// Velocity multiplier applied when no steering force is produced.
const BRAKING_RATE: f64 = 0.8;

/// Angle below which the facing counts as aligned with a target (about 0.6°).
const AIM_TOLERANCE: f64 = 0.01;

/// Kinematic state of a bot.
///
/// Speeds and forces are per update: `integrate` adds the velocity to the
/// position once per call.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Normalized direction of travel.
    pub heading: Vector2D,
    /// Perpendicular to `heading`.
    pub side: Vector2D,
    /// Where the bot is looking, independent of where it travels.
    pub facing: Vector2D,
    pub mass: f64,
    pub max_speed: f64,
    pub max_force: f64,
    pub max_turn_rate: f64,
    pub bounding_radius: f64,
}

impl Motion {
    pub fn new(position: Vector2D, config: &BotConfig) -> Self {
        let heading = Vector2D::UNIT_X;
        Self {
            position,
            velocity: Vector2D::ZERO,
            heading,
            side: heading.perp(),
            facing: heading,
            mass: config.mass,
            max_speed: config.max_speed,
            max_force: config.max_force,
            max_turn_rate: config.max_turn_rate,
            bounding_radius: config.scale * 10.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Applies one update worth of steering `force`.
    pub fn integrate(&mut self, force: Vector2D) {
        if force.is_zero() {
            self.velocity *= BRAKING_RATE;
        }

        let acceleration = force / self.mass;
        self.velocity += acceleration;
        self.velocity = self.velocity.truncated(self.max_speed);
        self.position += self.velocity;

        if !self.velocity.is_zero() {
            self.heading = self.velocity.normalized();
            self.side = self.heading.perp();
        }
    }

    /// Turns the facing toward `target` by at most the max turn rate.
    ///
    /// Returns `true` once the remaining angle is below the aim tolerance, in
    /// which case the facing is snapped exactly onto the target direction. A
    /// target at the bot's own position counts as faced.
    pub fn rotate_facing_toward(&mut self, target: Vector2D) -> bool {
        let to_target = (target - self.position).normalized();
        if to_target.is_zero() {
            return true;
        }

        let dot = self.facing.dot(to_target).clamp(-1.0, 1.0);
        let angle = dot.acos();

        if angle < AIM_TOLERANCE {
            self.facing = to_target;
            return true;
        }

        let step = angle.min(self.max_turn_rate);
        self.facing = self
            .facing
            .rotated(step * self.facing.turn_sign(to_target))
            .normalized();
        false
    }
}
