//! Maze grid and the randomized backtracking generator.
//!
//! Every cell stores its own four walls, so the wall between two neighbours
//! is recorded twice. Carving always clears both copies.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Wall flags of a single cell. `true` means the edge is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walls {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Walls {
    pub const ALL: Walls = Walls {
        north: true,
        south: true,
        east: true,
        west: true,
    };

    pub fn get(&self, dir: Dir) -> bool {
        match dir {
            Dir::Up => self.north,
            Dir::Down => self.south,
            Dir::Left => self.west,
            Dir::Right => self.east,
        }
    }

    pub fn set(&mut self, dir: Dir, present: bool) {
        match dir {
            Dir::Up => self.north = present,
            Dir::Down => self.south = present,
            Dir::Left => self.west = present,
            Dir::Right => self.east = present,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub walls: Walls,
    /// Only meaningful while the generator runs.
    pub visited: bool,
}

#[derive(Clone, Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

/// One pending step of the depth-first carve: the cell and the directions
/// it still has to try, in shuffled order.
struct Frame {
    x: usize,
    y: usize,
    dirs: [Dir; 4],
    next: usize,
}

impl Frame {
    fn enter(x: usize, y: usize, rng: &mut impl Rng) -> Self {
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        Frame { x, y, dirs, next: 0 }
    }
}

impl Maze {
    /// A grid where every wall is still standing.
    pub fn closed(width: usize, height: usize) -> Self {
        let cells = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| Cell {
                        x,
                        y,
                        walls: Walls::ALL,
                        visited: false,
                    })
                    .collect()
            })
            .collect();
        Maze {
            width,
            height,
            cells,
        }
    }

    /// Carves a perfect maze with randomized depth-first backtracking.
    ///
    /// The traversal keeps its own stack instead of recursing, so a 25x25
    /// grid never gets anywhere near the call-stack limit.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let mut maze = Maze::closed(width, height);
        if width == 0 || height == 0 {
            return maze;
        }

        let start = (rng.gen_range(0..width), rng.gen_range(0..height));
        maze.cells[start.1][start.0].visited = true;
        let mut stack = vec![Frame::enter(start.0, start.1, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.dirs.len() {
                stack.pop();
                continue;
            }
            let dir = frame.dirs[frame.next];
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let Some((nx, ny)) = maze.neighbor(x, y, dir) else {
                continue;
            };
            if maze.cells[ny][nx].visited {
                continue;
            }
            maze.open(x, y, dir);
            maze.cells[ny][nx].visited = true;
            stack.push(Frame::enter(nx, ny, rng));
        }

        debug!(width, height, start_x = start.0, start_y = start.1, "maze generated");
        maze
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(y).and_then(|row| row.get(x))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|row| row.iter())
    }

    /// Out-of-range lookups count as walled.
    pub fn has_wall(&self, x: usize, y: usize, dir: Dir) -> bool {
        self.cell(x, y).map_or(true, |cell| cell.walls.get(dir))
    }

    /// Same as [`Maze::has_wall`] but for signed coordinates.
    pub fn has_wall_at(&self, x: i64, y: i64, dir: Dir) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        self.has_wall(x as usize, y as usize, dir)
    }

    /// Removes the wall on `dir` from both cells sharing it. Returns `false`
    /// when `dir` leads off the grid.
    pub fn open(&mut self, x: usize, y: usize, dir: Dir) -> bool {
        let Some((nx, ny)) = self.neighbor(x, y, dir) else {
            return false;
        };
        self.cells[y][x].walls.set(dir, false);
        self.cells[ny][nx].walls.set(dir.opposite(), false);
        true
    }

    pub fn neighbor(&self, x: usize, y: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if nx >= self.width || ny >= self.height {
            return None;
        }
        Some((nx, ny))
    }

    pub fn open_neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        Dir::ALL
            .iter()
            .filter(|dir| !self.has_wall(x, y, **dir))
            .filter_map(|dir| self.neighbor(x, y, *dir))
            .collect()
    }

    /// Flood fill through open walls. Indexed `[y][x]`.
    pub fn reachable_from(&self, start: (usize, usize)) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.width]; self.height];
        if self.cell(start.0, start.1).is_none() {
            return seen;
        }
        let mut q = VecDeque::new();
        seen[start.1][start.0] = true;
        q.push_back(start);
        while let Some((x, y)) = q.pop_front() {
            for (nx, ny) in self.open_neighbors(x, y) {
                if !seen[ny][nx] {
                    seen[ny][nx] = true;
                    q.push_back((nx, ny));
                }
            }
        }
        seen
    }

    /// Shortest path through open walls, both endpoints included.
    pub fn path(&self, from: (usize, usize), to: (usize, usize)) -> Option<Vec<(usize, usize)>> {
        self.cell(from.0, from.1)?;
        self.cell(to.0, to.1)?;
        let mut prev: Vec<Vec<Option<(usize, usize)>>> = vec![vec![None; self.width]; self.height];
        let mut q = VecDeque::new();
        prev[from.1][from.0] = Some(from);
        q.push_back(from);
        while let Some(pos) = q.pop_front() {
            if pos == to {
                break;
            }
            for (nx, ny) in self.open_neighbors(pos.0, pos.1) {
                if prev[ny][nx].is_none() {
                    prev[ny][nx] = Some(pos);
                    q.push_back((nx, ny));
                }
            }
        }
        prev[to.1][to.0]?;
        let mut path = vec![to];
        let mut cur = to;
        while cur != from {
            cur = prev[cur.1][cur.0]?;
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }
}
