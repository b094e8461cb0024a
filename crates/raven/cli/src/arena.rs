//! The arena headless matches are played in.
use raven_core::{ArenaLayout, Team, Vector2D};

const SIZE: f64 = 500.0;

/// A walled square with two interior pillars, a spawn point in each corner
/// and, in team mode, a weapon cache per team.
pub fn standard_arena(team_mode: bool) -> ArenaLayout {
    let v = Vector2D::new;
    let mut layout = ArenaLayout::new(SIZE, SIZE)
        .with_boundary_walls()
        .with_wall(v(200.0, 150.0), v(200.0, 350.0))
        .with_wall(v(300.0, 350.0), v(300.0, 150.0))
        .with_spawn_point(v(60.0, 60.0))
        .with_spawn_point(v(440.0, 440.0))
        .with_spawn_point(v(440.0, 60.0))
        .with_spawn_point(v(60.0, 440.0))
        .with_team_mode(team_mode);

    if team_mode {
        layout = layout
            .with_weapon_cache(Team::Red, v(100.0, 250.0), 15.0)
            .with_weapon_cache(Team::Blue, v(400.0, 250.0), 15.0);
    }
    layout
}

/// Team of the `index`th bot: alternating red and blue in team mode.
pub fn team_for(index: usize, team_mode: bool) -> Team {
    match (team_mode, index % 2) {
        (false, _) => Team::Neutral,
        (true, 0) => Team::Red,
        (true, _) => Team::Blue,
    }
}
