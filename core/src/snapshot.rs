use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only view of a session for renderers and other observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Array2<Cell>,
    pub status: GameStatus,
    pub elapsed_secs: u32,
    pub remaining_flags: CellCount,
    pub triggered_mine: Option<Coord2>,
    pub difficulty_key: Option<String>,
}

impl Snapshot {
    pub fn from_session<C: Clock>(session: &Session<C>) -> Self {
        Self {
            board: session.board().cells().clone(),
            status: session.status(),
            elapsed_secs: session.elapsed_secs(),
            remaining_flags: session.remaining_flags(),
            triggered_mine: session.triggered_mine(),
            difficulty_key: session.difficulty_key().map(Into::into),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.board.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_session() {
        let clock = ManualClock::new();
        let layout = MineLayout::from_mine_coords((2, 3), &[(0, 2)]).unwrap();
        let mut session =
            Session::from_layout(Some("tiny".into()), &layout, clock.clone()).unwrap();
        session.reveal((1, 0));
        session.toggle_flag((0, 2));
        clock.advance_secs(4);

        let snapshot = session.snapshot();

        assert_eq!(snapshot.size(), (2, 3));
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.elapsed_secs, 4);
        assert_eq!(snapshot.remaining_flags, 0);
        assert_eq!(snapshot.difficulty_key.as_deref(), Some("tiny"));
        assert!(snapshot.cell_at((0, 2)).is_flagged());
        assert!(snapshot.cell_at((1, 1)).is_revealed());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let layout = MineLayout::from_mine_coords((1, 2), &[(0, 0)]).unwrap();
        let session = Session::from_layout(None, &layout, ManualClock::new()).unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["status"], "idle");
        assert_eq!(json["remaining_flags"], 1);
        assert!(json["difficulty_key"].is_null());
    }
}
