//! Short-term memory of sensed opponents.

use std::collections::BTreeMap;

use crate::env::{BotSnapshot, WorldView};
use crate::math::Vector2D;
use crate::types::{EntityId, Team};

/// What a bot remembers about one opponent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryRecord {
    /// Last time the opponent was seen or heard.
    pub time_last_sensed: f64,
    /// Start of the current stretch of visibility.
    pub time_became_visible: f64,
    pub time_last_visible: f64,
    pub last_sensed_position: Vector2D,
    /// Inside the field of view at the last vision update.
    pub within_fov: bool,
    /// Unobstructed line of sight at the last vision update or sound.
    pub shootable: bool,
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self {
            time_last_sensed: f64::NEG_INFINITY,
            time_became_visible: f64::NEG_INFINITY,
            time_last_visible: 0.0,
            last_sensed_position: Vector2D::ZERO,
            within_fov: false,
            shootable: false,
        }
    }
}

/// Observer details the memory needs for perception tests.
#[derive(Clone, Copy, Debug)]
pub struct Observer {
    pub id: EntityId,
    pub team: Team,
    pub position: Vector2D,
    pub facing: Vector2D,
    pub field_of_view: f64,
}

#[derive(Clone, Debug)]
pub struct SensoryMemory {
    span: f64,
    records: BTreeMap<EntityId, MemoryRecord>,
}

impl SensoryMemory {
    pub fn new(span: f64) -> Self {
        Self {
            span,
            records: BTreeMap::new(),
        }
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn record(&self, opponent: EntityId) -> Option<&MemoryRecord> {
        self.records.get(&opponent)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Teammates are never recorded as opponents in team games.
    fn is_opponent(observer: &Observer, other: &BotSnapshot, team_mode: bool) -> bool {
        other.id != observer.id && !(team_mode && other.team == observer.team)
    }

    /// Records that `source` was heard at `now`.
    pub fn update_with_sound_source(
        &mut self,
        observer: &Observer,
        source: &BotSnapshot,
        view: &dyn WorldView,
        now: f64,
    ) {
        if !Self::is_opponent(observer, source, view.is_team_mode()) {
            return;
        }

        let record = self.records.entry(source.id).or_default();
        if view.is_los_okay(observer.position, source.position) {
            record.shootable = true;
            record.last_sensed_position = source.position;
        } else {
            record.shootable = false;
        }
        record.time_last_sensed = now;
    }

    pub fn remove_bot_from_memory(&mut self, bot: EntityId) {
        self.records.remove(&bot);
    }

    /// Refreshes records from what the observer can currently see.
    ///
    /// Records of bots the world no longer knows about are dropped; bots that
    /// are not alive are neither visible nor shootable.
    pub fn update_vision(&mut self, observer: &Observer, view: &dyn WorldView, now: f64) {
        let bots = view.bots();
        self.records
            .retain(|id, _| bots.iter().any(|bot| bot.id == *id));

        let team_mode = view.is_team_mode();
        for bot in &bots {
            if !bot.is_alive() {
                if let Some(record) = self.records.get_mut(&bot.id) {
                    record.shootable = false;
                    record.within_fov = false;
                }
                continue;
            }
            if !Self::is_opponent(observer, bot, team_mode) {
                continue;
            }

            let record = self.records.entry(bot.id).or_default();
            if !view.is_los_okay(observer.position, bot.position) {
                record.shootable = false;
                record.within_fov = false;
                continue;
            }

            record.shootable = true;
            if is_in_fov(
                observer.position,
                observer.facing,
                bot.position,
                observer.field_of_view,
            ) {
                record.time_last_sensed = now;
                record.last_sensed_position = bot.position;
                record.time_last_visible = now;
                if !record.within_fov {
                    record.within_fov = true;
                    record.time_became_visible = now;
                }
            } else {
                record.within_fov = false;
            }
        }
    }

    /// Opponents sensed within the memory span, in id order.
    pub fn recently_sensed_opponents(&self, now: f64) -> Vec<EntityId> {
        self.records
            .iter()
            .filter(|(_, record)| now - record.time_last_sensed <= self.span)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_opponent_shootable(&self, opponent: EntityId) -> bool {
        self.record(opponent).is_some_and(|record| record.shootable)
    }

    pub fn is_opponent_within_fov(&self, opponent: EntityId) -> bool {
        self.record(opponent).is_some_and(|record| record.within_fov)
    }

    pub fn last_recorded_position(&self, opponent: EntityId) -> Option<Vector2D> {
        self.record(opponent).map(|record| record.last_sensed_position)
    }

    /// Seconds the opponent has been continuously visible, zero when hidden.
    pub fn time_opponent_visible(&self, opponent: EntityId, now: f64) -> f64 {
        match self.record(opponent) {
            Some(record) if record.within_fov => now - record.time_became_visible,
            _ => 0.0,
        }
    }

    /// Seconds since the opponent was last seen; infinite if never seen.
    pub fn time_opponent_out_of_view(&self, opponent: EntityId, now: f64) -> f64 {
        match self.record(opponent) {
            Some(record) => now - record.time_last_visible,
            None => f64::INFINITY,
        }
    }

    pub fn time_since_last_sensed(&self, opponent: EntityId, now: f64) -> f64 {
        match self.record(opponent) {
            Some(record) if record.within_fov => now - record.time_last_sensed,
            _ => 0.0,
        }
    }
}

/// Returns `true` if `target` lies within `fov` radians centered on `facing`.
pub fn is_in_fov(position: Vector2D, facing: Vector2D, target: Vector2D, fov: f64) -> bool {
    let to_target = (target - position).normalized();
    facing.dot(to_target) >= (fov / 2.0).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticView, snapshot};

    fn observer() -> Observer {
        Observer {
            id: EntityId(1),
            team: Team::Neutral,
            position: Vector2D::ZERO,
            facing: Vector2D::UNIT_X,
            field_of_view: std::f64::consts::PI,
        }
    }

    #[test]
    fn vision_records_opponents_in_front_only() {
        let view = StaticView::default()
            .with_bot(1, Vector2D::ZERO)
            .with_bot(2, Vector2D::new(50.0, 0.0))
            .with_bot(3, Vector2D::new(-50.0, 0.0));
        let mut memory = SensoryMemory::new(5.0);

        memory.update_vision(&observer(), &view, 1.0);

        assert!(memory.is_opponent_within_fov(EntityId(2)));
        assert!(!memory.is_opponent_within_fov(EntityId(3)));
        assert!(memory.is_opponent_shootable(EntityId(3)));
        assert_eq!(memory.recently_sensed_opponents(1.0), vec![EntityId(2)]);
        assert!(memory.record(EntityId(1)).is_none());
    }

    #[test]
    fn walls_block_vision() {
        let view = StaticView::default()
            .with_bot(2, Vector2D::new(50.0, 0.0))
            .with_wall(Vector2D::new(25.0, -10.0), Vector2D::new(25.0, 10.0));
        let mut memory = SensoryMemory::new(5.0);

        memory.update_vision(&observer(), &view, 1.0);

        assert!(!memory.is_opponent_shootable(EntityId(2)));
        assert!(memory.recently_sensed_opponents(1.0).is_empty());
    }

    #[test]
    fn sounds_are_forgotten_after_the_span() {
        let view = StaticView::default();
        let mut memory = SensoryMemory::new(5.0);
        let shooter = snapshot(7, Vector2D::new(-30.0, 0.0));

        memory.update_with_sound_source(&observer(), &shooter, &view, 2.0);

        assert_eq!(memory.recently_sensed_opponents(7.0), vec![EntityId(7)]);
        assert!(memory.recently_sensed_opponents(7.5).is_empty());
        assert_eq!(
            memory.last_recorded_position(EntityId(7)),
            Some(Vector2D::new(-30.0, 0.0))
        );
    }

    #[test]
    fn removed_and_vanished_bots_leave_memory() {
        let view = StaticView::default().with_bot(2, Vector2D::new(50.0, 0.0));
        let mut memory = SensoryMemory::new(5.0);
        memory.update_with_sound_source(
            &observer(),
            &snapshot(9, Vector2D::new(10.0, 0.0)),
            &view,
            0.0,
        );
        memory.update_vision(&observer(), &view, 0.5);
        assert!(memory.record(EntityId(9)).is_none());

        memory.remove_bot_from_memory(EntityId(2));
        assert!(memory.is_empty());
    }

    #[test]
    fn visibility_time_accumulates_while_in_view() {
        let view = StaticView::default().with_bot(2, Vector2D::new(50.0, 0.0));
        let mut memory = SensoryMemory::new(5.0);

        memory.update_vision(&observer(), &view, 1.0);
        memory.update_vision(&observer(), &view, 1.25);

        assert_eq!(memory.time_opponent_visible(EntityId(2), 1.5), 0.5);
        assert_eq!(memory.time_opponent_out_of_view(EntityId(2), 1.5), 0.25);
    }
}
