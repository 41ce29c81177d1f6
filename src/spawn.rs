//! Enemy and item placement for a fresh level.

use rand::seq::SliceRandom;
use rand::Rng;
use std::f64::consts::TAU;
use tracing::{debug, warn};

use crate::entity::{Collectible, CollectibleKind, Enemy, Player, Point, PowerUp, PowerUpKind};
use crate::maze::Maze;

/// Random draws per entity before falling back to a grid scan.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;
/// Enemies never spawn inside this box around the player.
const ENEMY_CLEARANCE: f64 = 3.0;

pub fn enemy_count(level: u32) -> usize {
    (level / 2 + 1) as usize
}

pub fn key_count(level: u32) -> usize {
    level.min(3) as usize
}

pub fn treasure_count(level: u32) -> usize {
    level.saturating_mul(2).min(10) as usize
}

pub fn power_up_count(level: u32) -> usize {
    if level > 1 {
        (level - 1).min(2) as usize
    } else {
        0
    }
}

/// Rejection-samples a cell of a `size`x`size` grid. After
/// [`MAX_PLACEMENT_ATTEMPTS`] misses it takes the first acceptable cell in
/// row-major order, or the far corner if nothing is acceptable at all.
fn pick_cell(
    size: usize,
    rng: &mut impl Rng,
    rejected: impl Fn(usize, usize) -> bool,
) -> (usize, usize) {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        if !rejected(x, y) {
            return (x, y);
        }
    }
    let fallback = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .find(|&(x, y)| !rejected(x, y));
    warn!(size, ?fallback, "placement retries exhausted, scanning for a free cell");
    fallback.unwrap_or((size - 1, size - 1))
}

pub fn place_enemies(level: u32, maze: &Maze, player: &Player, rng: &mut impl Rng) -> Vec<Enemy> {
    let size = maze.width();
    if size == 0 {
        return Vec::new();
    }
    let count = enemy_count(level);
    let p = player.pos;
    // Box test of the raw cell index against the player's
    // fractional position.
    let too_close = |x: usize, y: usize| {
        (x as f64 - p.x).abs() < ENEMY_CLEARANCE && (y as f64 - p.y).abs() < ENEMY_CLEARANCE
    };
    let enemies: Vec<Enemy> = (0..count)
        .map(|_| {
            let (x, y) = pick_cell(size, rng, too_close);
            let heading = rng.gen_range(0.0..TAU);
            Enemy::new(Point::cell_center(x, y), heading)
        })
        .collect();
    debug!(level, count = enemies.len(), "enemies placed");
    enemies
}

pub fn place_collectibles(
    level: u32,
    maze: &Maze,
    player: &Player,
    exit: Point,
    rng: &mut impl Rng,
) -> (Vec<Collectible>, Vec<PowerUp>) {
    let size = maze.width();
    if size == 0 {
        return (Vec::new(), Vec::new());
    }
    let player_cell = player.pos.cell();
    let exit_cell = exit.cell();
    let blocked = |x: usize, y: usize| {
        let c = (x as i64, y as i64);
        c == player_cell || c == exit_cell
    };

    let mut collectibles = Vec::with_capacity(key_count(level) + treasure_count(level));
    for (kind, count) in [
        (CollectibleKind::Key, key_count(level)),
        (CollectibleKind::Treasure, treasure_count(level)),
    ] {
        for _ in 0..count {
            let (x, y) = pick_cell(size, rng, blocked);
            collectibles.push(Collectible {
                pos: Point::cell_center(x, y),
                kind,
                collected: false,
            });
        }
    }

    let power_ups: Vec<PowerUp> = (0..power_up_count(level))
        .map(|_| {
            let (x, y) = pick_cell(size, rng, blocked);
            let kind = *PowerUpKind::ALL.choose(rng).unwrap_or(&PowerUpKind::Speed);
            PowerUp {
                pos: Point::cell_center(x, y),
                kind,
                collected: false,
            }
        })
        .collect();

    debug!(
        level,
        items = collectibles.len(),
        power_ups = power_ups.len(),
        "collectibles placed"
    );
    (collectibles, power_ups)
}
