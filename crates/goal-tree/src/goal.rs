//! Core goal trait.
//!
//! This module defines the [`Goal`] trait, the abstraction shared by atomic
//! and composite goals. The trait is generic over a borrowed context type so
//! goals can read and steer their owner without holding a reference to it.

use crate::GoalStatus;

/// A goal that can be processed against a borrowed context.
///
/// The context is a generic associated type so that implementations can use a
/// short-lived bundle of borrows (owner state, world view, outgoing messages)
/// that only exists for the duration of one update.
pub trait Goal: Send {
    /// Per-update context handed to every call.
    type Context<'a>;

    /// Message type that can be offered to the goal.
    type Message;

    /// Current lifecycle state of the goal.
    fn status(&self) -> GoalStatus;

    /// Prepares the goal. Called by [`Goal::process`] when the goal is inactive.
    fn activate(&mut self, ctx: &mut Self::Context<'_>);

    /// Advances the goal by one update and returns its new status.
    fn process(&mut self, ctx: &mut Self::Context<'_>) -> GoalStatus;

    /// Releases whatever the goal switched on in its owner.
    ///
    /// Called exactly once when the goal is removed from a [`crate::SubgoalStack`].
    fn terminate(&mut self, ctx: &mut Self::Context<'_>);

    /// Offers a message to the goal.
    ///
    /// Returns `true` when the message was consumed. The default implementation
    /// ignores every message.
    fn handle_message(&mut self, _ctx: &mut Self::Context<'_>, _msg: &Self::Message) -> bool {
        false
    }

    /// Returns `true` once the goal has either completed or failed.
    #[inline]
    fn is_finished(&self) -> bool {
        self.status().is_finished()
    }
}
