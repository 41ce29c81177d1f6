use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },
}

pub type GameResult<T> = Result<T, GameError>;
