//! LIFO subgoal container for composite goals.
//!
//! A [`SubgoalStack`] holds the decomposition of a composite goal. The front
//! goal is the one being pursued; it is processed every update and removed
//! (with its `terminate` hook) once it completes or fails.

use crate::{Goal, GoalStatus};

/// Stack of subgoals owned by a composite goal.
///
/// # Semantics
///
/// - [`push_front`](Self::push_front) makes a goal the next one to be processed
/// - [`push_back`](Self::push_back) queues a goal behind every existing one
/// - [`process`](Self::process) first removes finished goals from the front,
///   then processes the new front goal
///
/// A completed front goal with more subgoals behind it reports `Active` so the
/// composite keeps going; an empty stack reports `Completed`.
#[derive(Debug)]
pub struct SubgoalStack<G> {
    // Front of the stack is the last element.
    goals: Vec<G>,
}

impl<G> SubgoalStack<G> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { goals: Vec::new() }
    }

    /// Number of subgoals currently held.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Returns `true` if no subgoal is held.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// The goal that will be processed next.
    pub fn front(&self) -> Option<&G> {
        self.goals.last()
    }

    /// Mutable access to the goal that will be processed next.
    pub fn front_mut(&mut self) -> Option<&mut G> {
        self.goals.last_mut()
    }

    /// Iterates from the front goal to the back.
    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.goals.iter().rev()
    }

    /// Makes `goal` the front goal.
    pub fn push_front(&mut self, goal: G) {
        self.goals.push(goal);
    }

    /// Queues `goal` behind every existing subgoal.
    pub fn push_back(&mut self, goal: G) {
        self.goals.insert(0, goal);
    }

    /// Drops every subgoal without running their `terminate` hooks.
    ///
    /// Only use this when the owner resets whatever the goals switched on.
    pub fn discard(&mut self) {
        self.goals.clear();
    }
}

impl<G: Goal> SubgoalStack<G> {
    /// Removes finished front goals, then processes the front goal.
    pub fn process(&mut self, ctx: &mut G::Context<'_>) -> GoalStatus {
        while self.goals.last().is_some_and(|goal| goal.is_finished()) {
            if let Some(mut finished) = self.goals.pop() {
                finished.terminate(ctx);
            }
        }

        let Some(front) = self.goals.last_mut() else {
            return GoalStatus::Completed;
        };

        let status = front.process(ctx);

        // More work queued behind a completed front goal keeps the composite alive.
        if status.is_completed() && self.goals.len() > 1 {
            GoalStatus::Active
        } else {
            status
        }
    }

    /// Terminates and removes every subgoal, front first.
    pub fn clear(&mut self, ctx: &mut G::Context<'_>) {
        while let Some(mut goal) = self.goals.pop() {
            goal.terminate(ctx);
        }
    }

    /// Offers `msg` to the front goal only.
    pub fn forward_message(&mut self, ctx: &mut G::Context<'_>, msg: &G::Message) -> bool {
        match self.goals.last_mut() {
            Some(front) => front.handle_message(ctx, msg),
            None => false,
        }
    }
}

impl<G> Default for SubgoalStack<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestContext {
        log: Vec<String>,
    }

    /// Completes after `remaining` process calls.
    struct Countdown {
        name: &'static str,
        remaining: u32,
        status: GoalStatus,
        consumes: Option<u32>,
    }

    impl Countdown {
        fn new(name: &'static str, remaining: u32) -> Self {
            Self {
                name,
                remaining,
                status: GoalStatus::Inactive,
                consumes: None,
            }
        }

        fn consuming(mut self, msg: u32) -> Self {
            self.consumes = Some(msg);
            self
        }
    }

    impl Goal for Countdown {
        type Context<'a> = TestContext;
        type Message = u32;

        fn status(&self) -> GoalStatus {
            self.status
        }

        fn activate(&mut self, ctx: &mut TestContext) {
            self.status = GoalStatus::Active;
            ctx.log.push(format!("activate {}", self.name));
        }

        fn process(&mut self, ctx: &mut TestContext) -> GoalStatus {
            if self.status.is_inactive() {
                self.activate(ctx);
            }
            if self.remaining == 0 {
                self.status = GoalStatus::Completed;
            } else {
                self.remaining -= 1;
            }
            self.status
        }

        fn terminate(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("terminate {}", self.name));
        }

        fn handle_message(&mut self, ctx: &mut TestContext, msg: &u32) -> bool {
            if self.consumes == Some(*msg) {
                ctx.log.push(format!("{} got {}", self.name, msg));
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn empty_stack_reports_completed() {
        let mut stack: SubgoalStack<Countdown> = SubgoalStack::new();
        let mut ctx = TestContext::default();
        assert_eq!(stack.process(&mut ctx), GoalStatus::Completed);
    }

    #[test]
    fn front_goal_is_processed_first() {
        let mut stack = SubgoalStack::new();
        stack.push_front(Countdown::new("back", 0));
        stack.push_front(Countdown::new("front", 1));

        let mut ctx = TestContext::default();
        assert_eq!(stack.process(&mut ctx), GoalStatus::Active);
        assert_eq!(ctx.log, vec!["activate front"]);
    }

    #[test]
    fn completed_front_with_more_work_reports_active() {
        let mut stack = SubgoalStack::new();
        stack.push_front(Countdown::new("back", 5));
        stack.push_front(Countdown::new("front", 0));

        let mut ctx = TestContext::default();
        assert_eq!(stack.process(&mut ctx), GoalStatus::Active);

        // Next update removes the finished front goal and moves on.
        assert_eq!(stack.process(&mut ctx), GoalStatus::Active);
        assert_eq!(stack.len(), 1);
        assert_eq!(
            ctx.log,
            vec!["activate front", "terminate front", "activate back"]
        );
    }

    #[test]
    fn push_back_queues_behind_existing_goals() {
        let mut stack = SubgoalStack::new();
        stack.push_front(Countdown::new("first", 0));
        stack.push_back(Countdown::new("second", 0));

        let names: Vec<_> = stack.iter().map(|goal| goal.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn clear_terminates_every_goal() {
        let mut stack = SubgoalStack::new();
        stack.push_front(Countdown::new("a", 3));
        stack.push_front(Countdown::new("b", 3));

        let mut ctx = TestContext::default();
        stack.clear(&mut ctx);

        assert!(stack.is_empty());
        assert_eq!(ctx.log, vec!["terminate b", "terminate a"]);
    }

    #[test]
    fn messages_are_offered_to_the_front_goal_only() {
        let mut stack = SubgoalStack::new();
        stack.push_front(Countdown::new("back", 3).consuming(7));
        stack.push_front(Countdown::new("front", 3).consuming(9));

        let mut ctx = TestContext::default();
        assert!(!stack.forward_message(&mut ctx, &7));
        assert!(stack.forward_message(&mut ctx, &9));
        assert_eq!(ctx.log, vec!["front got 9"]);
    }
}
