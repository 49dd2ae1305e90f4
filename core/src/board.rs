use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One square of the board.
///
/// `is_mine` and `neighbor_mines` are only meaningful once mines have been placed,
/// see [`Board::mines_placed`]. `is_revealed` never goes back to `false`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
    neighbor_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    pub const fn neighbor_mines(self) -> u8 {
        self.neighbor_mines
    }

    /// Hidden and not flagged, the only state a reveal can act on.
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }
}

/// Rectangular grid of [`Cell`]s with a fixed mine count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    mines_placed: bool,
}

impl Board {
    /// Board with no mines laid yet, waiting for the first reveal.
    pub fn new(config: GameConfig) -> Self {
        Self {
            cells: Array2::default(config.size.to_nd_index()),
            mine_count: config.mines,
            mines_placed: false,
        }
    }

    /// Board whose mines are known up front.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let mut board = Self::new(layout.game_config());
        board.lay_mines(layout);
        board
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        )
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        CellCount::try_from(self.cells.len()).unwrap_or(CellCount::MAX)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged)
            .fold(0, |count, _| count + 1)
    }

    /// Copies mines from `layout` and derives every neighbor count.
    ///
    /// Runs once per board; later calls are ignored. Reveal and flag state is kept.
    pub(crate) fn lay_mines(&mut self, layout: &MineLayout) {
        if self.mines_placed {
            log::warn!("Mines already placed, ignoring new layout");
            return;
        }
        debug_assert_eq!(layout.size(), self.size());

        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            cell.is_mine = layout.contains_mine(coords);
            cell.neighbor_mines = layout.adjacent_mine_count(coords);
        }
        self.mine_count = layout.mine_count();
        self.mines_placed = true;
    }

    pub(crate) fn reveal(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].is_revealed = true;
    }

    pub(crate) fn set_flag(&mut self, coords: Coord2, flagged: bool) {
        self.cells[coords.to_nd_index()].is_flagged = flagged;
    }

    /// Uncovers every mine, used when the game is lost.
    pub(crate) fn reveal_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            cell.is_revealed = true;
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_layout(&MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(GameConfig::new((4, 5), 3).unwrap());
        assert_eq!(board.size(), (4, 5));
        assert_eq!(board.mine_count(), 3);
        assert_eq!(board.safe_cell_count(), 17);
        assert!(!board.mines_placed());
        assert!(board.cells().iter().all(|&cell| cell == Cell::default()));
    }

    #[test]
    fn neighbor_counts_match_literal_mines() {
        let board = board((4, 4), &[(0, 0), (0, 3), (2, 1), (3, 3)]);

        for ((row, col), cell) in board.cells().indexed_iter() {
            let coords = (row as Coord, col as Coord);
            let literal = board
                .iter_neighbors(coords)
                .filter(|&pos| board[pos].is_mine())
                .count();
            assert_eq!(usize::from(cell.neighbor_mines()), literal, "at {coords:?}");
        }
        assert_eq!(board[(1, 1)].neighbor_mines(), 2);
        assert_eq!(board[(3, 0)].neighbor_mines(), 1);
        assert_eq!(board[(3, 2)].neighbor_mines(), 2);
    }

    #[test]
    fn lay_mines_runs_once() {
        let mut board = board((2, 2), &[(0, 0)]);
        let other = MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        board.lay_mines(&other);
        assert!(board[(0, 0)].is_mine());
        assert!(!board[(1, 1)].is_mine());
    }

    #[test]
    fn lay_mines_keeps_flags() {
        let mut board = Board::new(GameConfig::new((2, 2), 1).unwrap());
        board.set_flag((1, 0), true);
        board.lay_mines(&MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap());
        assert!(board[(1, 0)].is_flagged());
        assert_eq!(board.count_flagged_neighbors((0, 0)), 1);
    }
}
