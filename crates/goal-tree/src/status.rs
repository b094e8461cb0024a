//! Status reported by goals.

/// The lifecycle state of a goal.
///
/// # Real-time Semantics
///
/// Unlike a turn-based behavior, a goal usually spans many updates:
/// - A freshly created goal is `Inactive` until its first process call
/// - It stays `Active` while it is making progress
/// - It ends as `Completed` or `Failed`, after which its owner removes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GoalStatus {
    /// The goal has not been activated yet (or asked to re-plan).
    #[default]
    Inactive,

    /// The goal is being pursued.
    Active,

    /// The goal reached its objective.
    Completed,

    /// The goal cannot be achieved.
    Failed,
}

impl GoalStatus {
    /// Returns `true` if this status is `Inactive`.
    #[inline]
    pub fn is_inactive(self) -> bool {
        matches!(self, GoalStatus::Inactive)
    }

    /// Returns `true` if this status is `Active`.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GoalStatus::Active)
    }

    /// Returns `true` if this status is `Completed`.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, GoalStatus::Completed)
    }

    /// Returns `true` if this status is `Failed`.
    #[inline]
    pub fn has_failed(self) -> bool {
        matches!(self, GoalStatus::Failed)
    }

    /// Returns `true` once the goal has either completed or failed.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Failed)
    }
}
