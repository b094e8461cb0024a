//! The closed set of goals a bot can pursue.
//!
//! Atomic goals drive the steering behaviors directly. Composite goals own a
//! [`SubgoalStack`] and report the status of their front subgoal.

use goal_tree::{Goal, GoalStatus, SubgoalStack};
use rand::Rng;
use strum::{Display, IntoStaticStr};

use super::GoalContext;
use crate::bot::Behaviors;
use crate::math::Vector2D;
use crate::messaging::{MessageKind, Telegram};

pub type GoalStack = SubgoalStack<BotGoal>;

/// Extra seconds a seek is allowed before the bot counts as stuck.
const SEEK_MARGIN_OF_ERROR: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GoalKind {
    Explore,
    Wander,
    MoveToPosition,
    SeekToPosition,
    AttackTarget,
    HuntTarget,
    DodgeSideToSide,
}

#[derive(Debug)]
pub enum BotGoal {
    Explore(Explore),
    Wander(Wander),
    MoveToPosition(MoveToPosition),
    SeekToPosition(SeekToPosition),
    AttackTarget(AttackTarget),
    HuntTarget(HuntTarget),
    DodgeSideToSide(DodgeSideToSide),
}

impl BotGoal {
    pub fn explore() -> Self {
        BotGoal::Explore(Explore::default())
    }

    pub fn wander() -> Self {
        BotGoal::Wander(Wander::default())
    }

    pub fn move_to_position(destination: Vector2D) -> Self {
        BotGoal::MoveToPosition(MoveToPosition::new(destination))
    }

    pub fn seek_to_position(position: Vector2D) -> Self {
        BotGoal::SeekToPosition(SeekToPosition::new(position))
    }

    pub fn attack_target() -> Self {
        BotGoal::AttackTarget(AttackTarget::default())
    }

    pub fn hunt_target() -> Self {
        BotGoal::HuntTarget(HuntTarget::default())
    }

    pub fn dodge_side_to_side(clockwise: bool) -> Self {
        BotGoal::DodgeSideToSide(DodgeSideToSide::new(clockwise))
    }

    pub fn kind(&self) -> GoalKind {
        match self {
            BotGoal::Explore(_) => GoalKind::Explore,
            BotGoal::Wander(_) => GoalKind::Wander,
            BotGoal::MoveToPosition(_) => GoalKind::MoveToPosition,
            BotGoal::SeekToPosition(_) => GoalKind::SeekToPosition,
            BotGoal::AttackTarget(_) => GoalKind::AttackTarget,
            BotGoal::HuntTarget(_) => GoalKind::HuntTarget,
            BotGoal::DodgeSideToSide(_) => GoalKind::DodgeSideToSide,
        }
    }

    /// Subgoals of a composite goal, front first. Empty for atomic goals.
    pub fn subgoals(&self) -> Option<&GoalStack> {
        match self {
            BotGoal::Explore(goal) => Some(&goal.subgoals),
            BotGoal::MoveToPosition(goal) => Some(&goal.subgoals),
            BotGoal::AttackTarget(goal) => Some(&goal.subgoals),
            BotGoal::HuntTarget(goal) => Some(&goal.subgoals),
            BotGoal::Wander(_) | BotGoal::SeekToPosition(_) | BotGoal::DodgeSideToSide(_) => None,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $goal:ident => $body:expr) => {
        match $self {
            BotGoal::Explore($goal) => $body,
            BotGoal::Wander($goal) => $body,
            BotGoal::MoveToPosition($goal) => $body,
            BotGoal::SeekToPosition($goal) => $body,
            BotGoal::AttackTarget($goal) => $body,
            BotGoal::HuntTarget($goal) => $body,
            BotGoal::DodgeSideToSide($goal) => $body,
        }
    };
}

impl Goal for BotGoal {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        delegate!(self, goal => goal.status())
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        delegate!(self, goal => goal.activate(ctx))
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        delegate!(self, goal => goal.process(ctx))
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        delegate!(self, goal => goal.terminate(ctx))
    }

    fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        delegate!(self, goal => goal.handle_message(ctx, msg))
    }
}

/// Heads for random destinations.
#[derive(Debug, Default)]
pub struct Explore {
    status: GoalStatus,
    destination: Option<Vector2D>,
    subgoals: GoalStack,
}

impl Explore {
    pub fn destination(&self) -> Option<Vector2D> {
        self.destination
    }
}

impl Goal for Explore {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(ctx);

        let destination = match self.destination {
            Some(destination) => destination,
            None => {
                let destination = ctx.body.random_destination(ctx.view);
                self.destination = Some(destination);
                destination
            }
        };

        ctx.body
            .request_path_to_position(destination, ctx.view, ctx.outbox);
        // Head straight for the destination while the planner answers.
        self.subgoals
            .push_front(BotGoal::seek_to_position(destination));
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        self.status = self.subgoals.process(ctx);
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        self.subgoals.clear(ctx);
    }

    fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        if self.subgoals.forward_message(ctx, msg) {
            return true;
        }
        match msg.kind {
            MessageKind::PathReady => {
                self.subgoals.clear(ctx);
                if let Some(destination) = self.destination {
                    self.subgoals
                        .push_front(BotGoal::seek_to_position(destination));
                }
                true
            }
            MessageKind::NoPathAvailable => {
                self.status = GoalStatus::Failed;
                true
            }
            _ => false,
        }
    }
}

/// Drifts around with the wander behavior. Never finishes on its own.
#[derive(Debug, Default)]
pub struct Wander {
    status: GoalStatus,
}

impl Goal for Wander {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        ctx.body.steering_mut().turn_on(Behaviors::WANDER);
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.body.steering_mut().turn_off(Behaviors::WANDER);
    }
}

/// Plans a path to a destination and follows it.
#[derive(Debug)]
pub struct MoveToPosition {
    status: GoalStatus,
    destination: Vector2D,
    subgoals: GoalStack,
}

impl MoveToPosition {
    pub fn new(destination: Vector2D) -> Self {
        Self {
            status: GoalStatus::Inactive,
            destination,
            subgoals: GoalStack::new(),
        }
    }

    pub fn destination(&self) -> Vector2D {
        self.destination
    }
}

impl Goal for MoveToPosition {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(ctx);
        ctx.body
            .request_path_to_position(self.destination, ctx.view, ctx.outbox);
        self.subgoals
            .push_front(BotGoal::seek_to_position(self.destination));
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        self.status = self.subgoals.process(ctx);
        if self.status.has_failed() {
            self.status = GoalStatus::Inactive;
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        self.subgoals.clear(ctx);
    }

    fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        if self.subgoals.forward_message(ctx, msg) {
            return true;
        }
        match msg.kind {
            MessageKind::PathReady => {
                self.subgoals.clear(ctx);
                self.subgoals
                    .push_front(BotGoal::seek_to_position(self.destination));
                true
            }
            MessageKind::NoPathAvailable => {
                self.status = GoalStatus::Failed;
                true
            }
            _ => false,
        }
    }
}

/// Seeks a point and fails if it takes much longer than expected.
#[derive(Debug)]
pub struct SeekToPosition {
    status: GoalStatus,
    position: Vector2D,
    start_time: f64,
    time_to_reach: f64,
}

impl SeekToPosition {
    pub fn new(position: Vector2D) -> Self {
        Self {
            status: GoalStatus::Inactive,
            position,
            start_time: 0.0,
            time_to_reach: 0.0,
        }
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    fn is_stuck(&self, now: f64) -> bool {
        now - self.start_time > self.time_to_reach
    }
}

impl Goal for SeekToPosition {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        self.start_time = ctx.now;
        self.time_to_reach =
            ctx.body.time_to_reach_position(self.position) + SEEK_MARGIN_OF_ERROR;

        let steering = ctx.body.steering_mut();
        steering.set_target(self.position);
        steering.turn_on(Behaviors::SEEK);
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        if self.is_stuck(ctx.now) {
            self.status = GoalStatus::Failed;
        } else if ctx.body.is_at_position(self.position) {
            self.status = GoalStatus::Completed;
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.body
            .steering_mut()
            .turn_off(Behaviors::SEEK | Behaviors::ARRIVE);
    }
}

/// Engages the current target: dodges while it is shootable, otherwise
/// hunts it down.
#[derive(Debug, Default)]
pub struct AttackTarget {
    status: GoalStatus,
    subgoals: GoalStack,
}

impl Goal for AttackTarget {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(ctx);

        if !ctx.body.targeting().is_target_present() {
            self.status = GoalStatus::Completed;
            return;
        }

        if ctx.body.is_target_shootable() {
            if ctx.body.can_step_left(ctx.view).is_some()
                || ctx.body.can_step_right(ctx.view).is_some()
            {
                let clockwise = ctx.body.rng_mut().gen_bool(0.5);
                self.subgoals
                    .push_front(BotGoal::dodge_side_to_side(clockwise));
            } else if let Some(target) = ctx.body.target_snapshot(ctx.view) {
                self.subgoals
                    .push_front(BotGoal::seek_to_position(target.position));
            }
        } else {
            self.subgoals.push_front(BotGoal::hunt_target());
        }
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        if self.status.is_completed() && self.subgoals.is_empty() {
            return self.status;
        }
        self.status = self.subgoals.process(ctx);
        if self.status.has_failed() {
            self.status = GoalStatus::Inactive;
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        self.subgoals.clear(ctx);
    }

    fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        self.subgoals.forward_message(ctx, msg)
    }
}

/// Goes to where the target was last sensed, then explores.
#[derive(Debug, Default)]
pub struct HuntTarget {
    status: GoalStatus,
    last_position_tried: bool,
    subgoals: GoalStack,
}

impl Goal for HuntTarget {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        self.subgoals.clear(ctx);

        if !ctx.body.targeting().is_target_present() {
            self.status = GoalStatus::Completed;
            return;
        }

        let last_seen = ctx
            .body
            .targeting()
            .last_recorded_position(ctx.body.memory());
        match last_seen {
            Some(position) if !self.last_position_tried => {
                self.last_position_tried = true;
                self.subgoals
                    .push_front(BotGoal::move_to_position(position));
            }
            _ => self.subgoals.push_front(BotGoal::explore()),
        }
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        if self.status.is_completed() && self.subgoals.is_empty() {
            return self.status;
        }
        self.status = self.subgoals.process(ctx);
        if ctx.body.is_target_within_fov() {
            self.status = GoalStatus::Completed;
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        self.subgoals.clear(ctx);
    }

    fn handle_message(&mut self, ctx: &mut GoalContext<'_>, msg: &Telegram) -> bool {
        self.subgoals.forward_message(ctx, msg)
    }
}

/// Strafes left and right while the target stays in view.
#[derive(Debug)]
pub struct DodgeSideToSide {
    status: GoalStatus,
    clockwise: bool,
    strafe_target: Vector2D,
}

impl DodgeSideToSide {
    pub fn new(clockwise: bool) -> Self {
        Self {
            status: GoalStatus::Inactive,
            clockwise,
            strafe_target: Vector2D::ZERO,
        }
    }

    pub fn strafe_target(&self) -> Vector2D {
        self.strafe_target
    }
}

impl Goal for DodgeSideToSide {
    type Context<'a> = GoalContext<'a>;
    type Message = Telegram;

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn activate(&mut self, ctx: &mut GoalContext<'_>) {
        self.status = GoalStatus::Active;
        ctx.body.steering_mut().turn_on(Behaviors::SEEK);

        let step = if self.clockwise {
            ctx.body.can_step_right(ctx.view)
        } else {
            ctx.body.can_step_left(ctx.view)
        };

        match step {
            Some(target) => {
                self.strafe_target = target;
                ctx.body.steering_mut().set_target(target);
            }
            None => {
                self.clockwise = !self.clockwise;
                self.status = GoalStatus::Inactive;
            }
        }
    }

    fn process(&mut self, ctx: &mut GoalContext<'_>) -> GoalStatus {
        if self.status.is_inactive() {
            self.activate(ctx);
        }
        if !ctx.body.is_target_within_fov() {
            self.status = GoalStatus::Completed;
        } else if ctx.body.is_at_position(self.strafe_target) {
            self.status = GoalStatus::Inactive;
        }
        self.status
    }

    fn terminate(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.body.steering_mut().turn_off(Behaviors::SEEK);
    }
}
