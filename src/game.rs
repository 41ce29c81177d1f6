//! The per-frame simulation.
//!
//! [`GameState`] owns everything that changes while playing. The frame loop
//! calls [`GameState::tick`] once per frame and forwards player input through
//! [`GameState::request_move`]; whatever draws the game only reads the state
//! and drains [`GameState::drain_events`].

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::f64::consts::TAU;
use tracing::{debug, info, trace};

use crate::entity::{
    ActivePowerUp, Collectible, CollectibleKind, Enemy, Player, Point, PowerUp, PowerUpKind,
    CELL_SIZE,
};
use crate::events::GameEvent;
use crate::level;
use crate::maze::Maze;
use crate::movement::{is_valid_enemy_move, is_valid_move, HeldDirections};
use crate::spawn;

/// The simulation assumes a fixed 60 Hz step.
pub const FRAMES_PER_SECOND: u64 = 60;
pub const START: Point = Point::new(0.5, 0.5);

const MOVE_STEP: f64 = 0.08;
const FAST_MOVE_STEP: f64 = 0.16;
const CAMERA_FOLLOW: f64 = 0.1;
const HEADING_CHANGE_CHANCE: f64 = 0.02;
const POWER_UP_SECONDS: f64 = 10.0;
const CATCH_PENALTY: u32 = 10;
const WIN_BONUS: u32 = 100;
const EXIT_RADIUS: f64 = 0.5;
pub const WIN_DELAY_FRAMES: u64 = 3 * FRAMES_PER_SECOND;
pub const SHAKE_FRAMES: u64 = FRAMES_PER_SECOND / 2;

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Rendered player position sliding toward the logical cell.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveAnimation {
    pub from: Point,
    pub to: Point,
    pub pos: Point,
    pub progress: f64,
    pub moving: bool,
}

impl MoveAnimation {
    pub fn at(p: Point) -> Self {
        MoveAnimation {
            from: p,
            to: p,
            pos: p,
            progress: 0.0,
            moving: false,
        }
    }

    fn start(&mut self, to: Point) {
        self.from = self.pos;
        self.to = to;
        self.progress = 0.0;
        self.moving = true;
    }

    /// Returns `true` on the frame the move completes.
    fn advance(&mut self, step: f64) -> bool {
        self.progress = (self.progress + step).clamp(0.0, 1.0);
        let arrived = self.progress >= 1.0;
        if arrived {
            self.moving = false;
        }
        let t = ease_out_cubic(self.progress);
        self.pos = Point::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        );
        arrived
    }
}

/// Viewport focus in cell units, easing after the rendered player.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub pos: Point,
    pub target: Point,
}

impl Camera {
    pub fn at(p: Point) -> Self {
        Camera { pos: p, target: p }
    }

    fn follow(&mut self) {
        self.pos.x += (self.target.x - self.pos.x) * CAMERA_FOLLOW;
        self.pos.y += (self.target.y - self.pos.y) * CAMERA_FOLLOW;
    }
}

pub struct GameState {
    pub level: u32,
    pub maze_size: usize,
    pub maze: Maze,
    pub player: Player,
    pub exit: Point,
    /// Cells entered this level. Only grows until the next level starts.
    pub visited: HashSet<(usize, usize)>,
    pub score: u32,
    pub keys: usize,
    pub treasures: usize,
    pub power_up: Option<ActivePowerUp>,
    /// Set between reaching the exit and the next level starting.
    pub game_over: bool,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub power_ups: Vec<PowerUp>,
    pub animation: MoveAnimation,
    pub camera: Camera,
    frame: u64,
    play_frames: u64,
    pub(crate) level_transition_at: Option<u64>,
    shake_until: u64,
    events: Vec<GameEvent>,
    pub(crate) rng: ChaCha8Rng,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        GameState::starting_at(1, seed)
    }

    pub fn starting_at(level: u32, seed: u64) -> Self {
        let mut state = GameState {
            level: level.clamp(1, level::MAX_LEVEL),
            maze_size: 0,
            maze: Maze::closed(0, 0),
            player: Player::new(START),
            exit: START,
            visited: HashSet::new(),
            score: 0,
            keys: 0,
            treasures: 0,
            power_up: None,
            game_over: false,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            animation: MoveAnimation::at(START),
            camera: Camera::at(START),
            frame: 0,
            play_frames: 0,
            level_transition_at: None,
            shake_until: 0,
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        level::start_level(&mut state);
        state
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self) {
        self.frame += 1;
        if let Some(at) = self.level_transition_at {
            if self.frame >= at {
                self.level_transition_at = None;
                if self.game_over {
                    level::advance_level(self);
                }
            }
        }
        if !self.game_over {
            self.play_frames += 1;
        }

        self.update_player_animation();
        self.update_enemies();
        self.update_power_up();

        if !self.game_over && self.check_exit() {
            self.win();
        }
    }

    /// Tries to start a one-cell move in the held direction(s). Ignored while
    /// a move is still animating or the level is already won.
    pub fn request_move(&mut self, held: HeldDirections) -> bool {
        if self.animation.moving || self.game_over {
            return false;
        }
        let from = self.player.pos;
        let to = held.target(from);
        if !is_valid_move(&self.maze, self.maze_size, from, to) {
            return false;
        }

        self.events.push(GameEvent::MoveStarted { from });
        self.player.pos = to;
        self.mark_visited();
        self.animation.start(to);
        self.collect_items();
        self.collect_power_ups();
        trace!(x = to.x, y = to.y, "player moved");
        true
    }

    /// Standing on the exit only counts once every key of the level is held.
    pub fn check_exit(&self) -> bool {
        self.player.pos.distance(self.exit) < EXIT_RADIUS && self.exit_unlocked()
    }

    pub fn keys_required(&self) -> usize {
        spawn::key_count(self.level)
    }

    pub fn exit_unlocked(&self) -> bool {
        self.keys == self.keys_required()
    }

    /// Share of the maze visited this level, 0 to 100.
    pub fn progress(&self) -> f64 {
        let total = self.maze_size * self.maze_size;
        if total == 0 {
            return 0.0;
        }
        (self.visited.len() as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Whole seconds of play. Stands still while a win is pending.
    pub fn elapsed_seconds(&self) -> u64 {
        self.play_frames / FRAMES_PER_SECOND
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn power_up_active(&self, kind: PowerUpKind) -> bool {
        self.power_up.map_or(false, |p| p.kind == kind)
    }

    pub fn power_up_label(&self) -> Option<&'static str> {
        self.power_up.map(|p| p.kind.label())
    }

    pub fn shaking(&self) -> bool {
        self.frame < self.shake_until
    }

    pub fn transition_pending(&self) -> bool {
        self.level_transition_at.is_some()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn mark_visited(&mut self) {
        let (x, y) = self.player.pos.cell();
        if x >= 0 && y >= 0 {
            self.visited.insert((x as usize, y as usize));
        }
    }

    fn update_player_animation(&mut self) {
        if self.animation.moving {
            let step = if self.power_up_active(PowerUpKind::Speed) {
                FAST_MOVE_STEP
            } else {
                MOVE_STEP
            };
            if self.animation.advance(step) {
                self.events.push(GameEvent::Arrived { at: self.player.pos });
            }
            self.camera.target = self.animation.pos;
        }
        self.camera.follow();
    }

    fn update_enemies(&mut self) {
        if self.power_up_active(PowerUpKind::Freeze) {
            return;
        }
        let intangible = self.power_up_active(PowerUpKind::Ghost);
        for i in 0..self.enemies.len() {
            self.move_enemy(i);
            let enemy = &self.enemies[i];
            let reach = (self.player.size + enemy.size) / CELL_SIZE;
            let caught = self.player.pos.distance(enemy.pos) < reach;
            // Each touching enemy counts on its own, so the penalty stacks.
            if caught && !self.game_over && !intangible {
                self.catch_player();
            }
        }
    }

    fn move_enemy(&mut self, i: usize) {
        let enemy = &mut self.enemies[i];
        if self.rng.gen::<f64>() < HEADING_CHANGE_CHANCE {
            enemy.heading = self.rng.gen_range(0.0..TAU);
        }
        let next = enemy.step_target();
        if is_valid_enemy_move(&self.maze, self.maze_size, enemy.pos, next) {
            enemy.pos = next;
        } else {
            enemy.heading = self.rng.gen_range(0.0..TAU);
        }
    }

    fn catch_player(&mut self) {
        self.player.pos = START;
        self.animation = MoveAnimation::at(START);
        self.camera.target = START;
        self.score = self.score.saturating_sub(CATCH_PENALTY);
        self.shake_until = self.frame + SHAKE_FRAMES;
        self.events.push(GameEvent::Caught { at: START });
        info!(score = self.score, "player caught");
    }

    fn update_power_up(&mut self) {
        let Some(active) = self.power_up.as_mut() else {
            return;
        };
        active.remaining = (active.remaining - 1.0 / FRAMES_PER_SECOND as f64).max(0.0);
        if active.remaining <= 0.0 {
            debug!(kind = ?active.kind, "power-up expired");
            self.power_up = None;
        }
    }

    fn win(&mut self) {
        self.game_over = true;
        self.score += WIN_BONUS;
        self.level_transition_at = Some(self.frame + WIN_DELAY_FRAMES);
        self.events.push(GameEvent::Won { at: self.exit });
        info!(level = self.level, score = self.score, "exit reached");
    }

    fn collect_items(&mut self) {
        let here = self.player.pos;
        for item in self.collectibles.iter_mut() {
            if item.collected || !item.pos.same_cell(here) {
                continue;
            }
            item.collected = true;
            self.score += item.kind.score();
            let event = match item.kind {
                CollectibleKind::Key => {
                    self.keys += 1;
                    GameEvent::KeyCollected { at: item.pos }
                }
                CollectibleKind::Treasure => {
                    self.treasures += 1;
                    GameEvent::TreasureCollected { at: item.pos }
                }
            };
            self.events.push(event);
            debug!(kind = ?item.kind, score = self.score, "item collected");
        }
    }

    fn collect_power_ups(&mut self) {
        let here = self.player.pos;
        for power_up in self.power_ups.iter_mut() {
            if power_up.collected || !power_up.pos.same_cell(here) {
                continue;
            }
            power_up.collected = true;
            self.power_up = Some(ActivePowerUp {
                kind: power_up.kind,
                remaining: POWER_UP_SECONDS,
            });
            self.events.push(GameEvent::PowerUpCollected {
                at: power_up.pos,
                kind: power_up.kind,
            });
            debug!(kind = ?power_up.kind, "power-up collected");
        }
    }
}
