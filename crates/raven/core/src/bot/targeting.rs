use std::collections::BTreeSet;

use crate::env::WorldView;
use crate::math::Vector2D;
use crate::types::EntityId;

use super::SensoryMemory;

/// Picks the current attack target from the opponents in memory.
#[derive(Clone, Debug, Default)]
pub struct TargetingSystem {
    target: Option<EntityId>,
}

impl TargetingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-selects the target and returns `true` if it changed.
    ///
    /// Only opponents the view reports alive are candidates. A shared team
    /// target wins while it is still in memory. Otherwise the closest recently
    /// sensed opponent is chosen.
    pub fn update(
        &mut self,
        position: Vector2D,
        memory: &SensoryMemory,
        team_target: Option<EntityId>,
        view: &dyn WorldView,
        now: f64,
    ) -> bool {
        let previous = self.target;
        let alive: BTreeSet<EntityId> = view
            .bots()
            .into_iter()
            .filter(|bot| bot.is_alive())
            .map(|bot| bot.id)
            .collect();
        let sensed: Vec<EntityId> = memory
            .recently_sensed_opponents(now)
            .into_iter()
            .filter(|id| alive.contains(id))
            .collect();

        self.target = match team_target {
            Some(shared) if sensed.contains(&shared) => Some(shared),
            _ => sensed
                .into_iter()
                .filter_map(|id| {
                    memory
                        .last_recorded_position(id)
                        .map(|at| (id, position.distance_sq(at)))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id),
        };

        self.target != previous
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn is_target_present(&self) -> bool {
        self.target.is_some()
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn is_target_within_fov(&self, memory: &SensoryMemory) -> bool {
        self.target
            .is_some_and(|target| memory.is_opponent_within_fov(target))
    }

    pub fn is_target_shootable(&self, memory: &SensoryMemory) -> bool {
        self.target
            .is_some_and(|target| memory.is_opponent_shootable(target))
    }

    pub fn last_recorded_position(&self, memory: &SensoryMemory) -> Option<Vector2D> {
        self.target
            .and_then(|target| memory.last_recorded_position(target))
    }

    pub fn time_target_visible(&self, memory: &SensoryMemory, now: f64) -> f64 {
        self.target
            .map_or(0.0, |target| memory.time_opponent_visible(target, now))
    }

    pub fn time_target_out_of_view(&self, memory: &SensoryMemory, now: f64) -> f64 {
        self.target
            .map_or(f64::INFINITY, |target| memory.time_opponent_out_of_view(target, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Observer;
    use crate::testing::StaticView;
    use crate::types::{BotStatus, Team};

    fn observer() -> Observer {
        Observer {
            id: EntityId(1),
            team: Team::Neutral,
            position: Vector2D::ZERO,
            facing: Vector2D::UNIT_X,
            field_of_view: std::f64::consts::PI,
        }
    }

    fn memory_with(view: &StaticView) -> SensoryMemory {
        let mut memory = SensoryMemory::new(5.0);
        memory.update_vision(&observer(), view, 1.0);
        memory
    }

    #[test]
    fn closest_sensed_opponent_is_selected() {
        let view = StaticView::default()
            .with_bot(2, Vector2D::new(80.0, 0.0))
            .with_bot(3, Vector2D::new(40.0, 10.0));
        let memory = memory_with(&view);
        let mut targeting = TargetingSystem::new();

        assert!(targeting.update(Vector2D::ZERO, &memory, None, &view, 1.0));
        assert_eq!(targeting.target(), Some(EntityId(3)));
        assert!(!targeting.update(Vector2D::ZERO, &memory, None, &view, 1.1));
    }

    #[test]
    fn sensed_team_target_takes_precedence() {
        let view = StaticView::default()
            .with_bot(2, Vector2D::new(80.0, 0.0))
            .with_bot(3, Vector2D::new(40.0, 10.0));
        let memory = memory_with(&view);
        let mut targeting = TargetingSystem::new();

        targeting.update(Vector2D::ZERO, &memory, Some(EntityId(2)), &view, 1.0);
        assert_eq!(targeting.target(), Some(EntityId(2)));

        targeting.update(Vector2D::ZERO, &memory, Some(EntityId(42)), &view, 1.0);
        assert_eq!(targeting.target(), Some(EntityId(3)));
    }

    #[test]
    fn forgotten_opponents_are_not_targeted() {
        let view = StaticView::default().with_bot(2, Vector2D::new(80.0, 0.0));
        let memory = memory_with(&view);
        let mut targeting = TargetingSystem::new();

        targeting.update(Vector2D::ZERO, &memory, None, &view, 10.0);
        assert!(!targeting.is_target_present());
    }

    #[test]
    fn killed_target_is_not_reselected() {
        let mut view = StaticView::default()
            .with_bot(2, Vector2D::new(40.0, 0.0))
            .with_bot(3, Vector2D::new(80.0, 0.0));
        let mut memory = memory_with(&view);
        let mut targeting = TargetingSystem::new();
        targeting.update(Vector2D::ZERO, &memory, None, &view, 1.0);
        assert_eq!(targeting.target(), Some(EntityId(2)));

        view.bots[0].status = BotStatus::Dead;
        targeting.clear_target();
        memory.update_vision(&observer(), &view, 1.5);

        assert!(!memory.is_opponent_shootable(EntityId(2)));
        assert!(!memory.is_opponent_within_fov(EntityId(2)));

        targeting.update(Vector2D::ZERO, &memory, None, &view, 1.6);
        assert_eq!(targeting.target(), Some(EntityId(3)));
    }

    #[test]
    fn dead_bots_are_skipped_before_vision_catches_up() {
        let mut view = StaticView::default()
            .with_bot(2, Vector2D::new(40.0, 0.0))
            .with_bot(3, Vector2D::new(80.0, 0.0));
        let memory = memory_with(&view);
        view.bots[0].status = BotStatus::Dead;

        let mut targeting = TargetingSystem::new();
        targeting.update(Vector2D::ZERO, &memory, Some(EntityId(2)), &view, 1.2);
        assert_eq!(targeting.target(), Some(EntityId(3)));
    }
}
