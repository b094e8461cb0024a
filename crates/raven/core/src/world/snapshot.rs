use std::sync::Arc;

use crate::env::{BotSnapshot, CacheSnapshot, WorldView};
use crate::math::{Vector2D, Wall2D};

/// Frozen copy of the world that bots can read from other threads while
/// their live state is checked out.
#[derive(Clone, Debug)]
pub struct ArenaSnapshot {
    pub(super) walls: Arc<[Wall2D]>,
    pub(super) bots: Vec<BotSnapshot>,
    pub(super) caches: Vec<CacheSnapshot>,
    pub(super) team_mode: bool,
    pub(super) extent: Vector2D,
}

impl WorldView for ArenaSnapshot {
    fn walls(&self) -> &[Wall2D] {
        &self.walls
    }

    fn bots(&self) -> Vec<BotSnapshot> {
        self.bots.clone()
    }

    fn weapon_caches(&self) -> Vec<CacheSnapshot> {
        self.caches.clone()
    }

    fn is_team_mode(&self) -> bool {
        self.team_mode
    }

    fn extent(&self) -> Vector2D {
        self.extent
    }

    fn bot(&self, id: crate::EntityId) -> Option<BotSnapshot> {
        self.bots.iter().find(|bot| bot.id == id).copied()
    }
}
