use crate::math::{Vector2D, Wall2D, crosses_any_wall, is_path_obstructed};
use crate::types::{BotStatus, EntityId, Team, WeaponType};

/// Point-in-time copy of the observable state of one bot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotSnapshot {
    pub id: EntityId,
    pub team: Team,
    pub status: BotStatus,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub facing: Vector2D,
    pub bounding_radius: f64,
    pub health: i32,
}

impl BotSnapshot {
    pub fn is_alive(&self) -> bool {
        self.status == BotStatus::Alive
    }
}

/// Point-in-time copy of a team weapon cache.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheSnapshot {
    pub id: EntityId,
    pub team: Team,
    pub position: Vector2D,
    pub radius: f64,
    pub weapons: Vec<WeaponType>,
}

impl CacheSnapshot {
    pub fn contains(&self, point: Vector2D) -> bool {
        self.position.distance_sq(point) < self.radius * self.radius
    }
}

/// World queries a bot may issue while it updates.
///
/// Implementations only have to expose walls and populations; line of sight
/// and path obstruction default to tests against [`walls`](Self::walls).
pub trait WorldView: Send + Sync {
    fn walls(&self) -> &[Wall2D];

    /// Every registered bot regardless of status. Callers filter for the
    /// statuses they care about.
    fn bots(&self) -> Vec<BotSnapshot>;

    fn weapon_caches(&self) -> Vec<CacheSnapshot>;

    fn is_team_mode(&self) -> bool;

    /// Width and height of the arena. Positions outside `[0, w] x [0, h]`
    /// are out of bounds.
    fn extent(&self) -> Vector2D;

    fn bot(&self, id: EntityId) -> Option<BotSnapshot> {
        self.bots().into_iter().find(|bot| bot.id == id)
    }

    fn is_los_okay(&self, a: Vector2D, b: Vector2D) -> bool {
        !crosses_any_wall(a, b, self.walls())
    }

    fn is_path_obstructed(&self, a: Vector2D, b: Vector2D, radius: f64) -> bool {
        is_path_obstructed(a, b, radius, self.walls())
    }

    fn contains(&self, point: Vector2D) -> bool {
        let extent = self.extent();
        (0.0..=extent.x).contains(&point.x) && (0.0..=extent.y).contains(&point.y)
    }
}
