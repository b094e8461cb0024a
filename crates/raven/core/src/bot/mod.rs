//! The bot entity and the subsystems it owns.
//!
//! A [`Bot`] pairs its [`Brain`] with a [`BotBody`] holding everything else:
//! motion, steering, path planner, sensory memory, targeting, weapons and the
//! regulators that pace them.
mod body;
mod memory;
mod motion;
mod navigation;
mod steering;
mod targeting;
mod weapons;

pub use body::{BotBody, BotRegulators};
pub use memory::{MemoryRecord, Observer, SensoryMemory, is_in_fov};
pub use motion::Motion;
pub use navigation::PathPlanner;
pub use steering::{Behaviors, Steering};
pub use targeting::TargetingSystem;
pub use weapons::{Weapon, WeaponSystem};

use std::sync::Arc;

use tracing::debug;

use crate::brain::{BotGoal, Brain, GoalContext};
use crate::config::{BotConfig, WeaponConfig};
use crate::env::{BotSnapshot, WorldView};
use crate::math::Vector2D;
use crate::messaging::{Outbox, Telegram};
use crate::types::{BotStatus, EntityId, Team};

#[derive(Debug)]
pub struct Bot {
    body: BotBody,
    brain: Brain,
}

impl Bot {
    /// Creates a bot in the spawning state. `seed` drives its private RNG.
    pub fn new(
        id: EntityId,
        team: Team,
        config: Arc<BotConfig>,
        weapon_config: Arc<WeaponConfig>,
        seed: u64,
    ) -> Self {
        let brain = Brain::new(&config);
        let mut body = BotBody::new(id, team, config, weapon_config, seed);
        body.steering_mut()
            .turn_on(Behaviors::SEPARATION | Behaviors::WALL_AVOIDANCE);
        Self { body, brain }
    }

    pub fn id(&self) -> EntityId {
        self.body.id()
    }

    pub fn team(&self) -> Team {
        self.body.team()
    }

    pub fn status(&self) -> BotStatus {
        self.body.status()
    }

    pub fn health(&self) -> i32 {
        self.body.health()
    }

    pub fn score(&self) -> u32 {
        self.body.score()
    }

    pub fn position(&self) -> Vector2D {
        self.body.position()
    }

    pub fn is_possessed(&self) -> bool {
        self.body.is_possessed()
    }

    pub fn body(&self) -> &BotBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut BotBody {
        &mut self.body
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn snapshot(&self) -> BotSnapshot {
        self.body.snapshot()
    }

    /// Brings the bot (back) into play at `position` with full health, a
    /// fresh blaster, no target and an empty plan.
    pub fn spawn(&mut self, position: Vector2D) {
        self.body.set_alive();
        self.brain.reset();
        self.body.steering_mut().reset_goal_behaviors();
        self.body.planner_mut().clear();
        self.body.targeting_mut().clear_target();
        self.body.set_position(position);
        self.body.weapons_mut().initialize();
        self.body.restore_health_to_maximum();
        debug!(target: "raven::bot", bot = %self.id(), %position, "bot spawned");
    }

    /// Runs one update: brain, movement, then the regulated AI subsystems
    /// and the aim-and-fire step unless a human controls the bot.
    pub fn update(&mut self, view: &dyn WorldView, now: f64, dt: f64, outbox: &mut Outbox) {
        let mut ctx = GoalContext::new(&mut self.body, view, outbox, now);
        self.brain.process(&mut ctx);

        self.body.update_movement(view, dt);

        if self.body.is_possessed() {
            return;
        }

        if self.body.regulators_mut().target_selection.is_ready(now) {
            self.body.update_targeting(view, now, outbox);
        }

        if self.body.regulators_mut().goal_arbitration.is_ready(now) {
            let mut ctx = GoalContext::new(&mut self.body, view, outbox, now);
            self.brain.arbitrate(&mut ctx);
        }

        if self.body.regulators_mut().vision_update.is_ready(now) {
            self.body.update_vision(view, now);
        }

        if self.body.regulators_mut().weapon_selection.is_ready(now) {
            self.body.select_weapon(view);
        }

        self.body.take_aim_and_shoot(view, now, outbox);
    }

    /// Offers the telegram to the brain first, then to the bot's own handler.
    pub fn handle_message(
        &mut self,
        telegram: &Telegram,
        view: &dyn WorldView,
        now: f64,
        outbox: &mut Outbox,
    ) -> bool {
        let mut ctx = GoalContext::new(&mut self.body, view, outbox, now);
        if self.brain.handle_message(&mut ctx, telegram) {
            return true;
        }
        self.body.handle_message(telegram, view, now, outbox)
    }

    /// Hands control to a human. Ignored unless the bot is alive.
    pub fn take_possession(&mut self) -> bool {
        if !self.body.is_alive() {
            return false;
        }
        self.body.set_possessed(true);
        debug!(target: "raven::bot", bot = %self.id(), "bot possessed");
        true
    }

    /// Returns control to the AI, which resumes by exploring.
    pub fn exorcise(&mut self) -> bool {
        if !self.body.is_possessed() {
            return false;
        }
        self.body.set_possessed(false);
        self.resume_with(BotGoal::explore());
        debug!(target: "raven::bot", bot = %self.id(), "bot exorcised");
        true
    }

    /// Sends a possessed bot to `destination`, replacing its current plan.
    pub fn move_possessed_to(&mut self, destination: Vector2D) -> bool {
        if !self.body.is_possessed() {
            return false;
        }
        self.resume_with(BotGoal::move_to_position(destination));
        true
    }

    /// Appends a move to `destination` to a possessed bot's plan.
    pub fn queue_possessed_move(&mut self, destination: Vector2D) -> bool {
        if !self.body.is_possessed() {
            return false;
        }
        self.brain.queue_goal_move_to_position(destination);
        true
    }

    pub fn is_ready_for_trigger_update(&mut self, now: f64) -> bool {
        self.body.regulators_mut().trigger_test.is_ready(now)
    }

    fn resume_with(&mut self, goal: BotGoal) {
        self.brain.replace_plan(&mut self.body, goal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{MessageKind, Payload};
    use crate::testing::StaticView;

    fn bot(id: u32) -> Bot {
        Bot::new(
            EntityId(id),
            Team::Neutral,
            Arc::new(BotConfig::default()),
            Arc::new(WeaponConfig::default()),
            u64::from(id),
        )
    }

    fn damage(from: u32, to: u32, amount: u32) -> Telegram {
        Telegram::new(
            EntityId(from),
            EntityId(to),
            MessageKind::Damage,
            0.0,
            Payload::Damage(amount),
        )
    }

    #[test]
    fn spawn_resets_state_regardless_of_history() {
        let view = StaticView::default();
        let mut bot = bot(1);
        bot.spawn(Vector2D::new(50.0, 50.0));
        let mut outbox = Outbox::new();
        bot.update(&view, 0.0, 1.0 / 60.0, &mut outbox);
        bot.handle_message(&damage(2, 1, 250), &view, 0.1, &mut outbox);
        bot.body_mut().weapons_mut().add_weapon(crate::types::WeaponType::RailGun);
        assert_eq!(bot.status(), BotStatus::Dead);

        bot.spawn(Vector2D::new(10.0, 20.0));

        assert_eq!(bot.status(), BotStatus::Alive);
        assert_eq!(bot.health(), 100);
        assert_eq!(bot.body().targeting().target(), None);
        assert!(bot.brain().subgoals().is_empty());
        assert_eq!(bot.position(), Vector2D::new(10.0, 20.0));
        assert_eq!(bot.body().weapons().held().count(), 1);
    }

    #[test]
    fn damage_is_ignored_while_spawning() {
        let view = StaticView::default();
        let mut bot = bot(1);
        let mut outbox = Outbox::new();

        assert!(bot.handle_message(&damage(2, 1, 30), &view, 0.0, &mut outbox));
        assert_eq!(bot.health(), 100);
        assert!(outbox.is_empty());
    }

    #[test]
    fn fatal_damage_notifies_the_shooter_once() {
        let view = StaticView::default();
        let mut bot = bot(1);
        bot.spawn(Vector2D::new(50.0, 50.0));
        let mut outbox = Outbox::new();

        bot.handle_message(&damage(2, 1, 60), &view, 0.0, &mut outbox);
        assert!(outbox.is_empty());
        bot.handle_message(&damage(2, 1, 60), &view, 0.0, &mut outbox);
        bot.handle_message(&damage(3, 1, 60), &view, 0.0, &mut outbox);

        assert_eq!(bot.health(), 0);
        let confirmations: Vec<_> = outbox
            .messages()
            .iter()
            .map(|message| (message.receiver, message.kind))
            .collect();
        assert_eq!(confirmations, vec![(EntityId(2), MessageKind::YouGotMe)]);
    }

    #[test]
    fn health_loss_is_additive() {
        let view = StaticView::default();
        let mut split = bot(1);
        let mut whole = bot(2);
        split.spawn(Vector2D::ZERO);
        whole.spawn(Vector2D::ZERO);
        let mut outbox = Outbox::new();

        split.body_mut().reduce_health(20, &view, &mut outbox);
        split.body_mut().reduce_health(45, &view, &mut outbox);
        whole.body_mut().reduce_health(65, &view, &mut outbox);

        assert_eq!(split.health(), whole.health());
        assert_eq!(split.health(), 35);
    }

    #[test]
    fn possession_requires_a_living_bot() {
        let mut bot = bot(1);
        assert!(!bot.take_possession());
        assert!(!bot.is_possessed());

        bot.spawn(Vector2D::ZERO);
        assert!(bot.take_possession());
        assert!(bot.is_possessed());
    }

    #[test]
    fn exorcism_resumes_with_exploration() {
        let mut bot = bot(1);
        bot.spawn(Vector2D::ZERO);
        bot.take_possession();

        assert!(bot.exorcise());

        assert!(!bot.is_possessed());
        assert_eq!(bot.brain().front_goal(), Some(crate::brain::GoalKind::Explore));
        assert!(!bot.exorcise());
    }

    #[test]
    fn kill_confirmation_scores_and_clears_the_target() {
        let view = StaticView::default();
        let mut bot = bot(1);
        bot.spawn(Vector2D::ZERO);
        let mut outbox = Outbox::new();
        let confirmation =
            Telegram::new(EntityId(2), EntityId(1), MessageKind::YouGotMe, 0.0, Payload::None);

        assert!(bot.handle_message(&confirmation, &view, 0.0, &mut outbox));
        assert_eq!(bot.score(), 1);
        assert!(!bot.body().targeting().is_target_present());
    }

    #[test]
    fn unknown_kinds_are_not_consumed() {
        let view = StaticView::default();
        let mut bot = bot(1);
        bot.spawn(Vector2D::ZERO);
        let mut outbox = Outbox::new();
        let deposit = Telegram::new(
            EntityId(2),
            EntityId(1),
            MessageKind::DepositWeapon,
            0.0,
            Payload::Weapon(crate::types::WeaponType::Shotgun),
        );

        assert!(!bot.handle_message(&deposit, &view, 0.0, &mut outbox));
    }

    #[test]
    fn replacing_the_plan_switches_off_goal_steering() {
        let mut bot = bot(1);
        bot.body_mut()
            .steering_mut()
            .turn_on(Behaviors::SEEK | Behaviors::WANDER | Behaviors::SEPARATION);

        bot.brain.replace_plan(&mut bot.body, BotGoal::explore());

        let steering = bot.body().steering();
        assert!(!steering.behaviors().intersects(Behaviors::GOAL_DRIVEN));
        assert!(steering.is_on(Behaviors::SEPARATION));
        assert_eq!(bot.brain().front_goal(), Some(crate::brain::GoalKind::Explore));
    }
}
