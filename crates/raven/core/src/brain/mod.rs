//! Top-level goal arbitration for a bot.
//!
//! The [`Brain`] owns the bot's goal stack. It picks a top-level goal through
//! its evaluators whenever the current plan finishes (or when the bot's
//! arbitration regulator fires) and is offered every telegram before the
//! bot's own handler.
mod context;
mod evaluators;
mod goals;

pub use context::GoalContext;
pub use evaluators::GoalEvaluator;
pub use goals::{
    AttackTarget, BotGoal, DodgeSideToSide, Explore, GoalKind, GoalStack, HuntTarget,
    MoveToPosition, SeekToPosition, Wander,
};

use goal_tree::{Goal, GoalStatus};
use tracing::trace;

use crate::bot::BotBody;
use crate::config::BotConfig;
use crate::math::Vector2D;
use crate::messaging::Telegram;

#[derive(Debug)]
pub struct Brain {
    status: GoalStatus,
    subgoals: GoalStack,
    evaluators: Vec<GoalEvaluator>,
}

impl Brain {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            status: GoalStatus::Inactive,
            subgoals: GoalStack::new(),
            evaluators: GoalEvaluator::standard_set(config),
        }
    }

    pub fn status(&self) -> GoalStatus {
        self.status
    }

    pub fn subgoals(&self) -> &GoalStack {
        &self.subgoals
    }

    pub fn front_goal(&self) -> Option<GoalKind> {
        self.subgoals.front().map(BotGoal::kind)
    }

    pub fn evaluators(&self) -> &[GoalEvaluator] {
        &self.evaluators
    }

    /// Runs the current plan, re-arbitrating on the next update once it is
    /// finished. A possessed bot keeps its finished plan until released.
    pub fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            if !ctx.body.is_possessed() {
                self.arbitrate(ctx);
            }
            self.status = GoalStatus::Active;
        }

        let outcome = self.subgoals.process(ctx);
        if outcome.is_finished() && !ctx.body.is_possessed() {
            self.status = GoalStatus::Inactive;
        }
        self.status
    }

    /// Switches to the most desirable top-level goal.
    pub fn arbitrate(&mut self, ctx: &mut GoalContext<'_>) {
        let best = self
            .evaluators
            .iter()
            .map(|evaluator| (evaluator.goal_kind(), evaluator.desirability(ctx.body)))
            .fold(None::<(GoalKind, f64)>, |best, candidate| match best {
                Some((_, score)) if score >= candidate.1 => best,
                _ => Some(candidate),
            });

        match best {
            Some((GoalKind::AttackTarget, _)) => self.add_goal_attack_target(ctx),
            Some(_) => self.add_goal_explore(ctx),
            None => {}
        }
    }

    pub fn add_goal_explore(&mut self, ctx: &mut GoalContext<'_>) {
        self.replace_unless_front(ctx, GoalKind::Explore, BotGoal::explore);
    }

    pub fn add_goal_attack_target(&mut self, ctx: &mut GoalContext<'_>) {
        self.replace_unless_front(ctx, GoalKind::AttackTarget, BotGoal::attack_target);
    }

    /// Abandons the current plan for a move to `destination`.
    pub fn add_goal_move_to_position(
        &mut self,
        ctx: &mut GoalContext<'_>,
        destination: Vector2D,
    ) {
        self.subgoals.clear(ctx);
        self.subgoals
            .push_front(BotGoal::move_to_position(destination));
        self.status = GoalStatus::Active;
    }

    /// Appends a move to `destination` behind the current plan.
    pub fn queue_goal_move_to_position(&mut self, destination: Vector2D) {
        self.subgoals
            .push_back(BotGoal::move_to_position(destination));
        self.status = GoalStatus::Active;
    }

    /// Pushes `goal` without terminating the current plan. The goal-driven
    /// steering behaviors the dropped goals switched on are turned off.
    pub(crate) fn replace_plan(&mut self, body: &mut BotBody, goal: BotGoal) {
        body.steering_mut().reset_goal_behaviors();
        self.subgoals.discard();
        self.subgoals.push_front(goal);
        self.status = GoalStatus::Active;
    }

    /// Drops every goal without running termination hooks.
    pub fn reset(&mut self) {
        self.subgoals.discard();
        self.status = GoalStatus::Inactive;
    }

    /// Offers `msg` to the front goal.
    pub fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        self.subgoals.forward_message(ctx, msg)
    }

    fn replace_unless_front(
        &mut self,
        ctx: &mut GoalContext<'_>,
        kind: GoalKind,
        make: fn() -> BotGoal,
    ) {
        if self.front_goal() == Some(kind) {
            return;
        }
        trace!(
            target: "raven::bot",
            bot = %ctx.body.id(),
            goal = %kind,
            "switching top-level goal"
        );
        self.subgoals.clear(ctx);
        self.subgoals.push_front(make());
    }
}
