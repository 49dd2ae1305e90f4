//! Minesweeper game engine: boards with deferred first-click-safe mine placement,
//! iterative flood-fill reveal, chording, a flag budget, win/loss tracking, best-time
//! records and fixed practice puzzles.

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use clock::*;
pub use controller::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use puzzle::*;
pub use records::*;
pub use settings::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod clock;
mod controller;
mod difficulty;
mod engine;
mod error;
mod generator;
mod layout;
mod puzzle;
mod records;
mod settings;
mod snapshot;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Builds a checked configuration: a non-empty board holding `0 < mines < rows * cols`.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    pub const fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MarkOutcome {
    #[default]
    NoChange,
    Changed,
    Won,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RevealOutcome {
    #[default]
    NoChange,
    Revealed,
    HitMine,
    Won,
}

/// Merges outcomes of a multi-cell reveal, a hit mine takes priority.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_degenerate_boards() {
        assert!(matches!(GameConfig::new((0, 5), 1), Err(GameError::EmptyBoard)));
        assert!(matches!(GameConfig::new((3, 3), 0), Err(GameError::NoMines)));
        assert!(matches!(GameConfig::new((3, 3), 9), Err(GameError::TooManyMines)));
        assert_eq!(GameConfig::new((3, 3), 8).unwrap().safe_cells(), 1);
    }

    #[test]
    fn reveal_outcome_merge_prefers_mine() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
