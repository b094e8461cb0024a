use crate::math::{Vector2D, Wall2D};
use crate::types::{Team, WeaponType};

/// Team weapon cache placed in the arena at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheSpec {
    pub team: Team,
    pub position: Vector2D,
    pub radius: f64,
    pub weapons: Vec<WeaponType>,
}

/// Static arena description a world is built from.
///
/// Geometry is assembled in code:
///
/// ```
/// use raven_core::{ArenaLayout, Team, Vector2D};
///
/// let arena = ArenaLayout::new(500.0, 500.0)
///     .with_boundary_walls()
///     .with_spawn_point(Vector2D::new(50.0, 50.0))
///     .with_weapon_cache(Team::Red, Vector2D::new(80.0, 80.0), 10.0)
///     .with_team_mode(true);
/// assert_eq!(arena.walls().len(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaLayout {
    width: f64,
    height: f64,
    walls: Vec<Wall2D>,
    spawn_points: Vec<Vector2D>,
    caches: Vec<CacheSpec>,
    team_mode: bool,
}

impl ArenaLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Adds four walls along the arena edges, normals facing inward.
    pub fn with_boundary_walls(self) -> Self {
        let (w, h) = (self.width, self.height);
        let top_left = Vector2D::new(0.0, 0.0);
        let top_right = Vector2D::new(w, 0.0);
        let bottom_right = Vector2D::new(w, h);
        let bottom_left = Vector2D::new(0.0, h);
        self.with_wall(top_left, top_right)
            .with_wall(top_right, bottom_right)
            .with_wall(bottom_right, bottom_left)
            .with_wall(bottom_left, top_left)
    }

    pub fn with_wall(mut self, from: Vector2D, to: Vector2D) -> Self {
        self.walls.push(Wall2D::new(from, to));
        self
    }

    pub fn with_spawn_point(mut self, point: Vector2D) -> Self {
        self.spawn_points.push(point);
        self
    }

    /// Adds an empty cache for `team`.
    pub fn with_weapon_cache(mut self, team: Team, position: Vector2D, radius: f64) -> Self {
        self.caches.push(CacheSpec {
            team,
            position,
            radius,
            weapons: Vec::new(),
        });
        self
    }

    pub fn with_stocked_cache(mut self, cache: CacheSpec) -> Self {
        self.caches.push(cache);
        self
    }

    pub fn with_team_mode(mut self, enabled: bool) -> Self {
        self.team_mode = enabled;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn extent(&self) -> Vector2D {
        Vector2D::new(self.width, self.height)
    }

    pub fn walls(&self) -> &[Wall2D] {
        &self.walls
    }

    pub fn spawn_points(&self) -> &[Vector2D] {
        &self.spawn_points
    }

    pub fn caches(&self) -> &[CacheSpec] {
        &self.caches
    }

    pub fn is_team_mode(&self) -> bool {
        self.team_mode
    }
}
