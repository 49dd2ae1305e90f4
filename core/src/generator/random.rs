use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Generation strategy that keeps the starting cell and its neighbors free of mines
/// and is otherwise uniformly random.
///
/// When the board is too crowded for a mine-free neighborhood only the starting cell
/// is kept safe.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }

    fn effective_start_tile(&self, config: GameConfig) -> StartTile {
        let total_cells = config.total_cells();
        let zone_size = 1 + NeighborIter::new(self.start, config.size).count() as CellCount;

        if config.mines + zone_size > total_cells {
            log::warn!(
                "Cannot make start cell zero with {} mines on {} cells, fallback to simple safe",
                config.mines,
                total_cells
            );
            StartTile::SimpleSafe
        } else {
            StartTile::AlwaysZero
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use StartTile::*;

        let start_tile = self.effective_start_tile(config);
        let excluded = |coords: Coord2| match start_tile {
            SimpleSafe => coords == self.start,
            AlwaysZero => coords == self.start || is_neighbor(coords, self.start),
        };

        let (rows, cols) = config.size;
        let candidates: Vec<Coord2> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|&coords| !excluded(coords))
            .collect();

        let wanted = usize::from(config.mines);
        let amount = wanted.min(candidates.len());
        if amount < wanted {
            log::warn!(
                "Only {} cells available for {} requested mines",
                candidates.len(),
                wanted
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        for i in index::sample(&mut rng, candidates.len(), amount) {
            mines[candidates[i].to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mines);
        log::debug!(
            "Placed {} mines on {}x{} board, start {:?} ({:?})",
            layout.mine_count(),
            rows,
            cols,
            self.start,
            start_tile
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generate(size: Coord2, mines: CellCount, start: Coord2) -> MineLayout {
        let config = GameConfig::new(size, mines).unwrap();
        RandomMinefieldGenerator::new(42, start).generate(config)
    }

    #[test]
    fn places_exact_mine_count() {
        let layout = generate((16, 30), 99, (8, 15));
        assert_eq!(layout.mine_count(), 99);
        assert_eq!(layout.size(), (16, 30));
    }

    #[test]
    fn same_seed_same_layout() {
        let a = generate((9, 9), 10, (0, 0));
        let b = generate((9, 9), 10, (0, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn crowded_board_falls_back_to_simple_safe() {
        // every cell of a 3x3 board is in the safe zone of its center
        let layout = generate((3, 3), 8, (1, 1));
        assert_eq!(layout.mine_count(), 8);
        assert!(!layout.contains_mine((1, 1)));
    }

    #[test]
    fn corner_zone_is_smaller() {
        // corner zone is 4 cells, leaving exactly 5 for 5 mines
        let layout = generate((3, 3), 5, (0, 0));
        for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(!layout.contains_mine(coords));
        }
        assert_eq!(layout.mine_count(), 5);
    }

    proptest! {
        #[test]
        fn first_click_zone_is_mine_free(
            rows in 1u8..20,
            cols in 1u8..20,
            density in 0.0f64..1.0,
            seed in any::<u64>(),
            start_row in any::<u8>(),
            start_col in any::<u8>(),
        ) {
            let total = mult(rows, cols);
            prop_assume!(total >= 2);
            let mines = ((f64::from(total - 1) * density) as CellCount).max(1);
            let start = (start_row % rows, start_col % cols);
            let config = GameConfig::new((rows, cols), mines).unwrap();

            let layout = RandomMinefieldGenerator::new(seed, start).generate(config);

            prop_assert_eq!(layout.mine_count(), mines);
            prop_assert!(!layout.contains_mine(start));
            let zone = 1 + NeighborIter::new(start, (rows, cols)).count() as CellCount;
            if mines + zone <= total {
                for pos in NeighborIter::new(start, (rows, cols)) {
                    prop_assert!(!layout.contains_mine(pos));
                }
            }
        }
    }
}
