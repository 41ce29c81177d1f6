//! Notifications the simulation emits for whatever draws effects.

use crate::entity::{Point, PowerUpKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

pub const PLAYER_BLUE: Rgb = Rgb::new(0x6b, 0xb5, 0xff);
pub const GOLD: Rgb = Rgb::new(0xff, 0xcc, 0x00);
pub const ENEMY_RED: Rgb = Rgb::new(0xff, 0x6b, 0x6b);
pub const POWER_GREEN: Rgb = Rgb::new(0x6b, 0xff, 0x6b);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    MoveStarted { from: Point },
    Arrived { at: Point },
    KeyCollected { at: Point },
    TreasureCollected { at: Point },
    PowerUpCollected { at: Point, kind: PowerUpKind },
    Caught { at: Point },
    Won { at: Point },
}

impl GameEvent {
    pub fn position(&self) -> Point {
        match *self {
            GameEvent::MoveStarted { from } => from,
            GameEvent::Arrived { at }
            | GameEvent::KeyCollected { at }
            | GameEvent::TreasureCollected { at }
            | GameEvent::PowerUpCollected { at, .. }
            | GameEvent::Caught { at }
            | GameEvent::Won { at } => at,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            GameEvent::MoveStarted { .. } | GameEvent::Arrived { .. } => PLAYER_BLUE,
            GameEvent::KeyCollected { .. } | GameEvent::Won { .. } => GOLD,
            GameEvent::TreasureCollected { .. } | GameEvent::Caught { .. } => ENEMY_RED,
            GameEvent::PowerUpCollected { .. } => POWER_GREEN,
        }
    }

    /// How many particles the effect is worth.
    pub fn particle_count(&self) -> usize {
        match self {
            GameEvent::MoveStarted { .. } => 8,
            GameEvent::Arrived { .. } => 12,
            GameEvent::KeyCollected { .. } | GameEvent::TreasureCollected { .. } => 15,
            GameEvent::PowerUpCollected { .. } | GameEvent::Caught { .. } => 20,
            GameEvent::Won { .. } => 80,
        }
    }
}
