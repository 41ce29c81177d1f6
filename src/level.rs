//! Level setup and the difficulty curve.

use tracing::info;

use crate::entity::Point;
use crate::game::{Camera, GameState, MoveAnimation, START};
use crate::maze::Maze;
use crate::spawn::{place_collectibles, place_enemies};

pub const BASE_MAZE_SIZE: usize = 15;
pub const MAX_MAZE_SIZE: usize = 25;
/// Enemy count keeps growing with the level, so the level itself is capped.
pub const MAX_LEVEL: u32 = 100;

/// The first level is always 15x15; after that the maze grows one cell per
/// level until it reaches 25x25.
pub fn maze_size_for_level(level: u32) -> usize {
    if level <= 1 {
        return BASE_MAZE_SIZE;
    }
    (BASE_MAZE_SIZE + level as usize).min(MAX_MAZE_SIZE)
}

/// The exit sits in the middle cell of the grid.
pub fn exit_for(maze_size: usize) -> Point {
    Point::cell_center(maze_size / 2, maze_size / 2)
}

/// Builds a fresh level for `state.level`. Score is the only progress that
/// carries over.
pub fn start_level(state: &mut GameState) {
    let size = maze_size_for_level(state.level);
    state.maze_size = size;

    state.player.pos = START;
    state.animation = MoveAnimation::at(START);
    state.camera = Camera::at(START);
    state.visited.clear();
    state.mark_visited();
    state.keys = 0;
    state.treasures = 0;
    state.power_up = None;

    state.maze = Maze::generate(size, size, &mut state.rng);
    state.exit = exit_for(size);
    state.enemies = place_enemies(state.level, &state.maze, &state.player, &mut state.rng);
    let (collectibles, power_ups) =
        place_collectibles(state.level, &state.maze, &state.player, state.exit, &mut state.rng);
    state.collectibles = collectibles;
    state.power_ups = power_ups;

    state.game_over = false;
    state.level_transition_at = None;
    info!(level = state.level, size, "level started");
}

/// Moves on to the next level once the win delay has run out.
pub fn advance_level(state: &mut GameState) {
    state.level = state.level.saturating_add(1).min(MAX_LEVEL);
    start_level(state);
}
