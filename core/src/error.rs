use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board must contain at least one mine")]
    NoMines,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Unknown difficulty `{0}`")]
    UnknownDifficulty(String),
    #[error("Puzzle reveals a mine at {0:?}")]
    MineRevealed(Coord2),
    #[error("Puzzle target {0:?} is already revealed")]
    GoalAlreadyMet(Coord2),
    #[error("Malformed puzzle definition: {0}")]
    Puzzle(#[from] serde_json::Error),
    #[error("Malformed settings: {0}")]
    Settings(#[from] toml::de::Error),
}

pub type Result<T> = core::result::Result<T, GameError>;
