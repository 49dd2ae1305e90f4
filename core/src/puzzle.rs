use serde::{Deserialize, Serialize};

use crate::*;

/// What the player has to do with a puzzle's target cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Reveal the target, which must not be a mine.
    Open,
    /// Flag the target, which must be a mine.
    Flag,
}

/// Hand-authored board used for guided practice.
///
/// Mines and initially revealed cells are fixed, neighbor counts are always derived.
/// The JSON form is
/// `{ "rows": 3, "cols": 3, "mines": [[0, 0]], "revealCells": [[2, 2]], "goal": "flag", "target": [0, 0] }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticePuzzle {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: Vec<Coord2>,
    #[serde(default)]
    pub reveal_cells: Vec<Coord2>,
    pub goal: Goal,
    pub target: Coord2,
}

impl PracticePuzzle {
    pub fn from_json(json: &str) -> Result<Self> {
        let puzzle: Self = serde_json::from_str(json)?;
        puzzle.validate()?;
        Ok(puzzle)
    }

    pub fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub fn layout(&self) -> Result<MineLayout> {
        let layout = MineLayout::from_mine_coords(self.size(), &self.mines)?;
        layout.game_config().validate()?;
        Ok(layout)
    }

    /// Checks bounds, mine count, that no pre-revealed cell is a mine and that the
    /// puzzle does not start solved.
    ///
    /// A goal that can never be met (flagging a safe cell, opening a mine) is accepted
    /// with a warning; such a puzzle can only be lost.
    pub fn validate(&self) -> Result<()> {
        let layout = self.layout()?;
        let config = layout.game_config();

        if !config.contains(self.target) {
            return Err(GameError::InvalidCoords);
        }
        for &coords in &self.reveal_cells {
            if !config.contains(coords) {
                return Err(GameError::InvalidCoords);
            }
            if layout.contains_mine(coords) {
                return Err(GameError::MineRevealed(coords));
            }
        }

        let target_is_mine = layout.contains_mine(self.target);
        match self.goal {
            Goal::Open if self.reveal_cells.contains(&self.target) => {
                return Err(GameError::GoalAlreadyMet(self.target));
            }
            Goal::Flag if !target_is_mine => {
                log::warn!("Puzzle asks to flag {:?}, which is not a mine", self.target)
            }
            Goal::Open if target_is_mine => {
                log::warn!("Puzzle asks to open {:?}, which is a mine", self.target)
            }
            _ => {}
        }
        Ok(())
    }

    /// Fresh board for this puzzle with its initial cells already uncovered.
    pub fn build_board(&self) -> Result<Board> {
        self.validate()?;
        let mut board = Board::from_layout(&self.layout()?);
        for &coords in &self.reveal_cells {
            board.reveal(coords);
        }
        Ok(board)
    }

    pub fn is_goal_met(&self, board: &Board) -> bool {
        let target = board[self.target];
        match self.goal {
            Goal::Open => target.is_revealed() && !target.is_mine(),
            Goal::Flag => target.is_flagged() && target.is_mine(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAG_PUZZLE: &str = r#"{
        "rows": 3,
        "cols": 3,
        "mines": [[0, 0]],
        "revealCells": [[1, 1], [2, 2]],
        "goal": "flag",
        "target": [0, 0]
    }"#;

    #[test]
    fn parses_authoring_format() {
        let puzzle = PracticePuzzle::from_json(FLAG_PUZZLE).unwrap();
        assert_eq!(puzzle.size(), (3, 3));
        assert_eq!(puzzle.mines, vec![(0, 0)]);
        assert_eq!(puzzle.reveal_cells, vec![(1, 1), (2, 2)]);
        assert_eq!(puzzle.goal, Goal::Flag);
        assert_eq!(puzzle.target, (0, 0));
    }

    #[test]
    fn board_derives_counts_and_reveals_verbatim() {
        let board = PracticePuzzle::from_json(FLAG_PUZZLE)
            .unwrap()
            .build_board()
            .unwrap();
        assert!(board.mines_placed());
        assert!(board[(1, 1)].is_revealed());
        assert_eq!(board[(1, 1)].neighbor_mines(), 1);
        // no flood fill from the zero at (2, 2)
        assert!(board[(2, 2)].is_revealed());
        assert_eq!(board[(2, 2)].neighbor_mines(), 0);
        assert!(!board[(2, 1)].is_revealed());
    }

    #[test]
    fn rejects_bad_definitions() {
        let revealed_mine = r#"{"rows":2,"cols":2,"mines":[[0,0]],"revealCells":[[0,0]],"goal":"open","target":[1,1]}"#;
        assert!(matches!(
            PracticePuzzle::from_json(revealed_mine),
            Err(GameError::MineRevealed((0, 0)))
        ));

        let target_outside = r#"{"rows":2,"cols":2,"mines":[[0,0]],"goal":"open","target":[2,0]}"#;
        assert!(matches!(
            PracticePuzzle::from_json(target_outside),
            Err(GameError::InvalidCoords)
        ));

        let no_mines = r#"{"rows":2,"cols":2,"mines":[],"goal":"open","target":[1,1]}"#;
        assert!(matches!(PracticePuzzle::from_json(no_mines), Err(GameError::NoMines)));

        let solved = r#"{"rows":3,"cols":3,"mines":[[0,0]],"revealCells":[[2,2]],"goal":"open","target":[2,2]}"#;
        assert!(matches!(
            PracticePuzzle::from_json(solved),
            Err(GameError::GoalAlreadyMet((2, 2)))
        ));

        let bad_goal = r#"{"rows":2,"cols":2,"mines":[[0,0]],"goal":"guess","target":[1,1]}"#;
        assert!(matches!(PracticePuzzle::from_json(bad_goal), Err(GameError::Puzzle(_))));
    }

    #[test]
    fn goal_checks_actual_mines() {
        let mut puzzle = PracticePuzzle::from_json(FLAG_PUZZLE).unwrap();
        let mut board = puzzle.build_board().unwrap();
        assert!(!puzzle.is_goal_met(&board));
        board.set_flag((0, 0), true);
        assert!(puzzle.is_goal_met(&board));

        // a flag on a safe target never satisfies the goal
        puzzle.target = (0, 1);
        let mut board = puzzle.build_board().unwrap();
        board.set_flag((0, 1), true);
        assert!(!puzzle.is_goal_met(&board));
    }
}
