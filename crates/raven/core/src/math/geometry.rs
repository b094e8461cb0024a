use super::Vector2D;

/// A wall segment. The normal points out of the solid side.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall2D {
    pub from: Vector2D,
    pub to: Vector2D,
    pub normal: Vector2D,
}

impl Wall2D {
    pub fn new(from: Vector2D, to: Vector2D) -> Self {
        let normal = (to - from).normalized().perp();
        Self { from, to, normal }
    }

    pub fn center(&self) -> Vector2D {
        (self.from + self.to) * 0.5
    }
}

/// Intersection of segments `ab` and `cd`.
///
/// Returns the fraction along `ab` at which the segments cross and the
/// crossing point, or `None` for parallel or disjoint segments.
pub fn segment_intersection(
    a: Vector2D,
    b: Vector2D,
    c: Vector2D,
    d: Vector2D,
) -> Option<(f64, Vector2D)> {
    let r_top = (a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y);
    let s_top = (a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y);
    let bottom = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);

    if bottom.abs() < f64::EPSILON {
        return None;
    }

    let r = r_top / bottom;
    let s = s_top / bottom;

    if (0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&s) {
        Some((r, a + (b - a) * r))
    } else {
        None
    }
}

/// Returns `true` if segment `ab` crosses any wall.
pub fn crosses_any_wall(a: Vector2D, b: Vector2D, walls: &[Wall2D]) -> bool {
    walls
        .iter()
        .any(|wall| segment_intersection(a, b, wall.from, wall.to).is_some())
}

/// Closest point where segment `ab` hits a wall, with its distance from `a`.
pub fn closest_wall_intersection(
    a: Vector2D,
    b: Vector2D,
    walls: &[Wall2D],
) -> Option<(f64, Vector2D)> {
    let length = a.distance(b);
    walls
        .iter()
        .filter_map(|wall| segment_intersection(a, b, wall.from, wall.to))
        .map(|(fraction, point)| (fraction * length, point))
        .min_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0))
}

/// Shortest distance from `point` to segment `ab`.
pub fn distance_to_segment(point: Vector2D, a: Vector2D, b: Vector2D) -> f64 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq < f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Returns `true` if a circle overlaps any wall.
pub fn walls_overlap_circle(walls: &[Wall2D], center: Vector2D, radius: f64) -> bool {
    walls
        .iter()
        .any(|wall| distance_to_segment(center, wall.from, wall.to) < radius)
}

/// Returns `true` if a circle of `radius` cannot sweep from `from` to `to`
/// without touching a wall.
pub fn is_path_obstructed(from: Vector2D, to: Vector2D, radius: f64, walls: &[Wall2D]) -> bool {
    let total = from.distance(to);
    if total < f64::EPSILON {
        return walls_overlap_circle(walls, from, radius);
    }
    let heading = (to - from) / total;
    let step = (radius * 0.5).max(f64::EPSILON);

    let mut travelled = 0.0;
    while travelled < total {
        if walls_overlap_circle(walls, from + heading * travelled, radius) {
            return true;
        }
        travelled += step;
    }
    walls_overlap_circle(walls, to, radius)
}
