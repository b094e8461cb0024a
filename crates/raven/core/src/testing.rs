//! Fixtures shared by unit tests.

use crate::env::{BotSnapshot, CacheSnapshot, WorldView};
use crate::math::{Vector2D, Wall2D};
use crate::types::{BotStatus, EntityId, Team};

/// Hand-built world with fixed contents.
#[derive(Clone, Debug)]
pub struct StaticView {
    pub walls: Vec<Wall2D>,
    pub bots: Vec<BotSnapshot>,
    pub caches: Vec<CacheSnapshot>,
    pub team_mode: bool,
    pub extent: Vector2D,
}

impl Default for StaticView {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            bots: Vec::new(),
            caches: Vec::new(),
            team_mode: false,
            extent: Vector2D::new(1000.0, 1000.0),
        }
    }
}

impl StaticView {
    pub fn with_bot(mut self, id: u32, position: Vector2D) -> Self {
        self.bots.push(snapshot(id, position));
        self
    }

    pub fn with_wall(mut self, from: Vector2D, to: Vector2D) -> Self {
        self.walls.push(Wall2D::new(from, to));
        self
    }
}

pub fn snapshot(id: u32, position: Vector2D) -> BotSnapshot {
    BotSnapshot {
        id: EntityId(id),
        team: Team::Neutral,
        status: BotStatus::Alive,
        position,
        velocity: Vector2D::ZERO,
        facing: Vector2D::UNIT_X,
        bounding_radius: 5.0,
        health: 100,
    }
}

impl WorldView for StaticView {
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
}
