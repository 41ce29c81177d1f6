//! A grid maze crawler: carve a maze, scatter keys, treasure, power-ups and
//! wandering enemies over it, and run the frame-by-frame simulation that a
//! front-end draws.

pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod maze;
pub mod movement;
pub mod particles;
pub mod render;
pub mod spawn;

pub use entity::{Point, PowerUpKind};
pub use error::{GameError, GameResult};
pub use events::GameEvent;
pub use game::GameState;
pub use maze::{Dir, Maze};
pub use movement::HeldDirections;
