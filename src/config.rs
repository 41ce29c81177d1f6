//! Runtime settings taken from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{GameError, GameResult};
use crate::level::MAX_LEVEL;

const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub frame_ms: u64,
    pub seed: Option<u64>,
    pub start_level: u32,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            frame_ms: DEFAULT_FRAME_MS,
            seed: None,
            start_level: 1,
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> GameResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup` so callers can feed values from
    /// somewhere other than the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GameResult<Self> {
        let defaults = Settings::default();
        let frame_ms = parse(&lookup, "MAZE_FRAME_MS", |v: &u64| *v > 0)?.unwrap_or(defaults.frame_ms);
        let seed = parse(&lookup, "MAZE_SEED", |_: &u64| true)?;
        let start_level = parse(&lookup, "MAZE_LEVEL", |v: &u32| (1..=MAX_LEVEL).contains(v))?
            .unwrap_or(defaults.start_level);
        let log_path = lookup("MAZE_LOG").filter(|v| !v.is_empty()).map(PathBuf::from);
        Ok(Settings {
            frame_ms,
            seed,
            start_level,
            log_path,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    valid: impl Fn(&T) -> bool,
) -> GameResult<Option<T>> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if valid(&v) => Ok(Some(v)),
        _ => Err(GameError::InvalidSetting { name, value: raw }),
    }
}
