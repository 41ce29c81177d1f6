//! Move legality against the maze walls.

use crate::entity::Point;
use crate::maze::{Dir, Maze};

/// Direction flags held by the input side when a move is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn only(dir: Dir) -> Self {
        let mut held = HeldDirections::default();
        held.set(dir, true);
        held
    }

    pub fn set(&mut self, dir: Dir, pressed: bool) {
        match dir {
            Dir::Up => self.up = pressed,
            Dir::Down => self.down = pressed,
            Dir::Left => self.left = pressed,
            Dir::Right => self.right = pressed,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Sums every held flag onto `from`. Opposite flags cancel out and two
    /// perpendicular ones give a diagonal, which no validator accepts.
    pub fn target(&self, from: Point) -> Point {
        let mut to = from;
        if self.up {
            to.y -= 1.0;
        }
        if self.down {
            to.y += 1.0;
        }
        if self.left {
            to.x -= 1.0;
        }
        if self.right {
            to.x += 1.0;
        }
        to
    }
}

fn in_bounds(maze_size: usize, to: Point) -> bool {
    let hi = maze_size as f64 + 0.5;
    to.x >= 0.5 && to.x < hi && to.y >= 0.5 && to.y < hi
}

/// Direction of a single-axis boundary crossing between two cells.
fn crossing(from: (i64, i64), to: (i64, i64)) -> Option<Dir> {
    if from.1 == to.1 {
        if to.0 > from.0 {
            return Some(Dir::Right);
        } else if to.0 < from.0 {
            return Some(Dir::Left);
        }
    } else if from.0 == to.0 {
        if to.1 > from.1 {
            return Some(Dir::Down);
        } else if to.1 < from.1 {
            return Some(Dir::Up);
        }
    }
    None
}

/// Player step check. Only a single-axis change of cell through an open wall
/// of the source cell is legal.
pub fn is_valid_move(maze: &Maze, maze_size: usize, from: Point, to: Point) -> bool {
    if !in_bounds(maze_size, to) {
        return false;
    }
    let src = from.cell();
    match crossing(src, to.cell()) {
        Some(dir) => !maze.has_wall_at(src.0, src.1, dir),
        None => false,
    }
}

/// Enemy step check. Enemies drift freely inside their cell and only hit
/// the wall test when the step crosses into another cell.
pub fn is_valid_enemy_move(maze: &Maze, maze_size: usize, from: Point, to: Point) -> bool {
    if !in_bounds(maze_size, to) {
        return false;
    }
    let src = from.cell();
    let dst = to.cell();
    if src == dst {
        return true;
    }
    // A step that changes both cell coordinates would cut a wall corner.
    // Enemies get the same single-axis rule as the player here, unlike a
    // bare same-cell test that lets such steps through.
    match crossing(src, dst) {
        Some(dir) => !maze.has_wall_at(src.0, src.1, dir),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 3x3 grid with a single corridor opened from (0,0) to (1,0).
    fn corridor() -> Maze {
        let mut maze = Maze::closed(3, 3);
        maze.open(0, 0, Dir::Right);
        maze
    }

    #[test]
    fn open_wall_allows_step() {
        let maze = corridor();
        assert!(is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(1.5, 0.5)));
        assert!(is_valid_move(&maze, 3, Point::new(1.5, 0.5), Point::new(0.5, 0.5)));
    }

    #[test]
    fn closed_wall_blocks_step() {
        let maze = corridor();
        assert!(!is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(0.5, 1.5)));
        assert!(!is_valid_move(&maze, 3, Point::new(1.5, 0.5), Point::new(2.5, 0.5)));
    }

    #[test]
    fn outside_bounds_is_rejected() {
        let maze = corridor();
        assert!(!is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(-0.5, 0.5)));
        assert!(!is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(0.5, -0.5)));
        assert!(!is_valid_move(&maze, 3, Point::new(2.5, 2.5), Point::new(3.5, 2.5)));
    }

    #[test]
    fn diagonal_and_zero_moves_are_rejected() {
        let mut maze = Maze::closed(3, 3);
        maze.open(0, 0, Dir::Right);
        maze.open(0, 0, Dir::Down);
        assert!(!is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(1.5, 1.5)));
        assert!(!is_valid_move(&maze, 3, Point::new(0.5, 0.5), Point::new(0.5, 0.5)));
    }

    #[test]
    fn enemy_moves_freely_within_a_cell() {
        let maze = Maze::closed(3, 3);
        assert!(is_valid_enemy_move(&maze, 3, Point::new(1.5, 1.5), Point::new(1.9, 1.1)));
        assert!(!is_valid_enemy_move(&maze, 3, Point::new(1.99, 1.5), Point::new(2.01, 1.5)));
    }

    #[test]
    fn enemy_crosses_open_walls() {
        let maze = corridor();
        assert!(is_valid_enemy_move(&maze, 3, Point::new(0.99, 0.5), Point::new(1.02, 0.5)));
        assert!(!is_valid_enemy_move(&maze, 3, Point::new(0.6, 0.99), Point::new(0.6, 1.02)));
    }

    #[test]
    fn enemy_cannot_cut_corners() {
        let mut maze = Maze::closed(3, 3);
        maze.open(0, 0, Dir::Right);
        maze.open(0, 0, Dir::Down);
        maze.open(1, 0, Dir::Down);
        assert!(!is_valid_enemy_move(&maze, 3, Point::new(0.99, 0.99), Point::new(1.01, 1.01)));
    }

    #[test]
    fn enemy_bounds_start_at_cell_centre_of_edge_row() {
        let maze = Maze::closed(3, 3);
        assert!(!is_valid_enemy_move(&maze, 3, Point::new(0.52, 1.5), Point::new(0.49, 1.5)));
    }

    #[test]
    fn held_flags_sum_into_target() {
        let from = Point::new(2.5, 2.5);
        assert_eq!(HeldDirections::only(Dir::Left).target(from), Point::new(1.5, 2.5));
        let both = HeldDirections {
            up: true,
            right: true,
            ..HeldDirections::default()
        };
        assert_eq!(both.target(from), Point::new(3.5, 1.5));
        let cancel = HeldDirections {
            up: true,
            down: true,
            ..HeldDirections::default()
        };
        assert_eq!(cancel.target(from), from);
        assert!(!HeldDirections::default().any());
    }

    proptest! {
        #[test]
        fn step_is_legal_iff_source_wall_is_open(
            seed in any::<u64>(),
            x in 0usize..15,
            y in 0usize..15,
            d in 0usize..4,
        ) {
            let maze = Maze::generate(15, 15, &mut ChaCha8Rng::seed_from_u64(seed));
            let dir = Dir::ALL[d];
            let from = Point::cell_center(x, y);
            let to = HeldDirections::only(dir).target(from);
            let inside = maze.neighbor(x, y, dir).is_some();
            let expected = inside && !maze.has_wall(x, y, dir);
            prop_assert_eq!(is_valid_move(&maze, 15, from, to), expected);
        }
    }
}
