use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// How much of the board around the first reveal is kept free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StartTile {
    /// Only the revealed cell is safe, used when the board is too crowded for a zero.
    SimpleSafe,
    /// The revealed cell and all its neighbors are safe, so it opens as a zero.
    AlwaysZero,
}
