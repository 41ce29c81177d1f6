//! Terminals only report key presses (and repeats), never releases, so a
//! direction counts as held for a short window after its last press. Only
//! one direction is ever reported: the latest press still inside the window.

use std::time::{Duration, Instant};

use crate::maze::Dir;
use crate::movement::HeldDirections;

pub const INPUT_HOLD_MS: u64 = 120;

#[derive(Default)]
pub struct KeyHold {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Dir>,
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}

impl KeyHold {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, dir: Dir, now: Instant) {
        self.last_seen[idx_for_dir(dir)] = Some(now);
        self.last_pressed = Some(dir);
    }

    fn live(&self, dir: Dir, now: Instant) -> Option<Instant> {
        self.last_seen[idx_for_dir(dir)]
            .filter(|t| now.saturating_duration_since(*t) <= Duration::from_millis(INPUT_HOLD_MS))
    }

    pub fn active(&self, now: Instant) -> Option<Dir> {
        if let Some(dir) = self.last_pressed {
            if self.live(dir, now).is_some() {
                return Some(dir);
            }
        }
        let mut best: Option<(Dir, Instant)> = None;
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            if let Some(t) = self.live(dir, now) {
                match best {
                    None => best = Some((dir, t)),
                    Some((_, bt)) if t > bt => best = Some((dir, t)),
                    _ => {}
                }
            }
        }
        best.map(|(dir, _)| dir)
    }

    pub fn held(&self, now: Instant) -> HeldDirections {
        self.active(now).map(HeldDirections::only).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.last_seen = [None; 4];
        self.last_pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::maze::Maze;

    #[test]
    fn presses_expire() {
        let t0 = Instant::now();
        let mut keys = KeyHold::new();
        keys.press(Dir::Left, t0);
        assert_eq!(keys.held(t0), HeldDirections::only(Dir::Left));
        let later = t0 + Duration::from_millis(INPUT_HOLD_MS + 1);
        assert!(!keys.held(later).any());
    }

    #[test]
    fn latest_press_wins() {
        let t0 = Instant::now();
        let mut keys = KeyHold::new();
        keys.press(Dir::Up, t0);
        keys.press(Dir::Right, t0 + Duration::from_millis(10));
        let held = keys.held(t0 + Duration::from_millis(20));
        assert_eq!(held, HeldDirections::only(Dir::Right));
        keys.clear();
        assert!(!keys.held(t0).any());
        assert_eq!(keys.active(t0), None);
    }

    #[test]
    fn repeat_of_an_older_key_takes_over() {
        let t0 = Instant::now();
        let mut keys = KeyHold::new();
        keys.press(Dir::Down, t0);
        keys.press(Dir::Left, t0 + Duration::from_millis(10));
        keys.press(Dir::Down, t0 + Duration::from_millis(20));
        assert_eq!(keys.active(t0 + Duration::from_millis(30)), Some(Dir::Down));
    }

    #[test]
    fn blocked_tap_does_not_spoil_the_next_one() {
        let mut state = GameState::new(1);
        state.enemies.clear();
        state.collectibles.clear();
        state.power_ups.clear();
        let mut maze = Maze::closed(15, 15);
        maze.open(0, 0, Dir::Right);
        state.maze = maze;

        let t0 = Instant::now();
        let mut keys = KeyHold::new();
        keys.press(Dir::Up, t0);
        assert!(!state.request_move(keys.held(t0)));

        let t1 = t0 + Duration::from_millis(50);
        keys.press(Dir::Right, t1);
        assert!(state.request_move(keys.held(t1)));
        assert_eq!(state.player.pos.cell(), (1, 0));
    }
}
