//! Vector math and wall geometry shared by movement, vision and projectiles.

mod geometry;
mod vector;

pub use geometry::{
    Wall2D, closest_wall_intersection, crosses_any_wall, distance_to_segment, is_path_obstructed,
    segment_intersection, walls_overlap_circle,
};
pub use vector::Vector2D;
