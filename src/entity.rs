//! Things that live on top of the maze.
//!
//! Positions are continuous, measured in cells, with `n + 0.5` being the
//! centre of cell `n`.

use std::f64::consts::TAU;

pub const PLAYER_SIZE: f64 = 14.0;
pub const ENEMY_SIZE: f64 = 12.0;
pub const ENEMY_SPEED: f64 = 0.03;
/// Reference cell edge the entity sizes are expressed against.
pub const CELL_SIZE: f64 = 35.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn cell_center(x: usize, y: usize) -> Self {
        Point::new(x as f64 + 0.5, y as f64 + 0.5)
    }

    /// Grid cell containing this point. May be negative or past the edge.
    pub fn cell(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn same_cell(&self, other: Point) -> bool {
        self.cell() == other.cell()
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Logical position. Jumps a whole cell the moment a move is accepted.
    pub pos: Point,
    pub size: f64,
}

impl Player {
    pub fn new(pos: Point) -> Self {
        Player {
            pos,
            size: PLAYER_SIZE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Point,
    pub size: f64,
    pub speed: f64,
    /// Radians, `0` points along +x.
    pub heading: f64,
}

impl Enemy {
    pub fn new(pos: Point, heading: f64) -> Self {
        Enemy {
            pos,
            size: ENEMY_SIZE,
            speed: ENEMY_SPEED,
            heading: heading.rem_euclid(TAU),
        }
    }

    pub fn step_target(&self) -> Point {
        Point::new(
            self.pos.x + self.heading.cos() * self.speed,
            self.pos.y + self.heading.sin() * self.speed,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectibleKind {
    Key,
    Treasure,
}

impl CollectibleKind {
    pub fn score(self) -> u32 {
        match self {
            CollectibleKind::Key => 50,
            CollectibleKind::Treasure => 25,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub pos: Point,
    pub kind: CollectibleKind,
    pub collected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Speed,
    Ghost,
    Freeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Ghost, PowerUpKind::Freeze];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Speed Boost",
            PowerUpKind::Ghost => "Ghost Mode",
            PowerUpKind::Freeze => "Freeze Enemies",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub pos: Point,
    pub kind: PowerUpKind,
    pub collected: bool,
}

/// The modifier currently in effect and its remaining seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_of_fractional_positions() {
        assert_eq!(Point::new(0.5, 0.5).cell(), (0, 0));
        assert_eq!(Point::new(1.99, 3.0).cell(), (1, 3));
        assert_eq!(Point::new(-0.2, 0.4).cell(), (-1, 0));
    }

    #[test]
    fn enemy_steps_along_heading() {
        let enemy = Enemy::new(Point::cell_center(2, 2), 0.0);
        let next = enemy.step_target();
        assert!((next.x - 2.53).abs() < 1e-9);
        assert!((next.y - 2.5).abs() < 1e-9);
    }

    #[test]
    fn heading_is_normalized() {
        let enemy = Enemy::new(Point::new(0.5, 0.5), -1.0);
        assert!((0.0..TAU).contains(&enemy.heading));
    }
}
