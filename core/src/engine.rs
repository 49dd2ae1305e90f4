use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Playing (first reveal, or construction of a practice session)
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Board built, no mines placed yet, clock not running.
    #[default]
    Idle,
    /// Mines placed and clock running.
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Rules a session is played under.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    /// Win by revealing every safe cell.
    Standard,
    /// Win by meeting the puzzle's goal on its target cell.
    Practice(PracticePuzzle),
}

/// One game from the first reveal to a win or loss.
///
/// All player actions are infallible: anything that does not apply to the current
/// board (revealing an open cell, flagging past the budget, acting after the game
/// ended) is a no-op reported as `NoChange`.
#[derive(Clone, Debug)]
pub struct Session<C: Clock = SystemClock> {
    key: Option<String>,
    mode: Mode,
    template: Board,
    board: Board,
    status: GameStatus,
    revealed_count: CellCount,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
    seed: u64,
    stopwatch: Stopwatch,
    clock: C,
}

impl<C: Clock> Session<C> {
    /// Standard game on a preset; mines are laid around the first reveal, which
    /// always opens a zero unless the board is too crowded for one.
    pub fn new(difficulty: Difficulty, clock: C) -> Result<Self> {
        Self::with_seed(difficulty, rand::random(), clock)
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64, clock: C) -> Result<Self> {
        difficulty.config.validate()?;
        let template = Board::new(difficulty.config);
        Ok(Self::build(
            Some(difficulty.key),
            Mode::Standard,
            template,
            seed,
            clock,
        ))
    }

    /// Standard game on a known layout, no placement happens on the first reveal.
    pub fn from_layout(key: Option<String>, layout: &MineLayout, clock: C) -> Result<Self> {
        layout.game_config().validate()?;
        let template = Board::from_layout(layout);
        Ok(Self::build(key, Mode::Standard, template, 0, clock))
    }

    /// Practice game, playable right away.
    pub fn practice(puzzle: PracticePuzzle, clock: C) -> Result<Self> {
        let template = puzzle.build_board()?;
        Ok(Self::build(None, Mode::Practice(puzzle), template, 0, clock))
    }

    fn build(key: Option<String>, mode: Mode, template: Board, seed: u64, clock: C) -> Self {
        let mut session = Self {
            key,
            mode,
            board: template.clone(),
            template,
            status: GameStatus::Idle,
            revealed_count: 0,
            flagged_count: 0,
            triggered_mine: None,
            seed,
            stopwatch: Stopwatch::default(),
            clock,
        };
        session.restart();
        session
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.contains(coords).then(|| self.board[coords])
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Best-time key; `None` for practice puzzles and unnamed layouts.
    pub fn difficulty_key(&self) -> Option<&str> {
        match self.mode {
            Mode::Standard => self.key.as_deref(),
            Mode::Practice(_) => None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Flags still available, the budget equals the mine count.
    pub fn remaining_flags(&self) -> CellCount {
        self.board.mine_count().saturating_sub(self.flagged_count)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.stopwatch.elapsed_secs(self.clock.now())
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_session(self)
    }

    /// Whether chording at `coords` would do anything.
    pub fn is_chordable(&self, coords: Coord2) -> bool {
        let Some(cell) = self.cell_at(coords) else {
            return false;
        };
        !self.status.is_finished()
            && cell.is_revealed()
            && !cell.is_mine()
            && cell.neighbor_mines() > 0
            && self.board.count_flagged_neighbors(coords) == cell.neighbor_mines()
            && self
                .board
                .iter_neighbors(coords)
                .any(|pos| self.board[pos].is_hidden())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use MarkOutcome::*;

        if !self.accepts_move(coords) {
            return NoChange;
        }

        let cell = self.board[coords];
        if cell.is_revealed() {
            return NoChange;
        }

        if cell.is_flagged() {
            self.board.set_flag(coords, false);
            self.flagged_count -= 1;
            log::debug!("Unflag {:?}, {} flags left", coords, self.remaining_flags());
            return Changed;
        }

        if self.flagged_count >= self.board.mine_count() {
            log::debug!("Out of flags, ignoring flag at {:?}", coords);
            return NoChange;
        }

        self.board.set_flag(coords, true);
        self.flagged_count += 1;
        log::debug!("Flag {:?}, {} flags left", coords, self.remaining_flags());

        if matches!(self.status, GameStatus::Playing) && self.is_goal_met() {
            self.end_game(true);
            Won
        } else {
            Changed
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.accepts_move(coords) {
            return RevealOutcome::NoChange;
        }

        if !self.board[coords].is_hidden() {
            log::debug!("Cell at {:?} is not hidden, nothing to reveal", coords);
            return RevealOutcome::NoChange;
        }

        if self.status.is_idle() {
            self.start(coords);
        }

        let outcome = self.reveal_single_cell(coords);
        self.settle(outcome)
    }

    /// Chord: reveals every hidden neighbor of a numbered cell once enough flags surround it.
    ///
    /// Flags are only counted, so a misplaced flag lets a mine through and loses the game.
    pub fn auto_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if !self.accepts_move(coords) {
            return NoChange;
        }

        let cell = self.board[coords];
        if !cell.is_revealed() || cell.is_mine() || cell.neighbor_mines() == 0 {
            return NoChange;
        }

        let flagged = self.board.count_flagged_neighbors(coords);
        if flagged != cell.neighbor_mines() {
            log::debug!(
                "Chord at {:?} needs {} flags, found {}",
                coords,
                cell.neighbor_mines(),
                flagged
            );
            return NoChange;
        }

        let neighbors: Vec<_> = self.board.iter_neighbors(coords).collect();
        let mut outcome = NoChange;
        for neighbor_coords in neighbors {
            outcome = outcome | self.reveal_single_cell(neighbor_coords);
            if outcome == HitMine {
                break;
            }
        }
        self.settle(outcome)
    }

    /// Discards the board for a fresh one of the same configuration with the clock at zero.
    pub fn reset(&mut self) {
        self.seed = SmallRng::seed_from_u64(self.seed).random();
        self.board = self.template.clone();
        self.restart();
        log::info!("Game reset");
    }

    fn restart(&mut self) {
        self.status = GameStatus::Idle;
        self.stopwatch = Stopwatch::default();
        self.triggered_mine = None;
        self.flagged_count = 0;
        self.revealed_count = self
            .board
            .cells()
            .iter()
            .filter(|cell| cell.is_revealed())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);

        if matches!(self.mode, Mode::Practice(_)) {
            self.status = GameStatus::Playing;
            self.stopwatch.start(self.clock.now());
        }
    }

    fn accepts_move(&self, coords: Coord2) -> bool {
        if !self.board.contains(coords) {
            log::warn!("Coordinates {:?} outside of {:?} board", coords, self.size());
            return false;
        }
        if self.status.is_finished() {
            log::debug!("Game already ended, ignoring move at {:?}", coords);
            return false;
        }
        true
    }

    /// Lays the mines around `anchor` if needed and starts the clock.
    fn start(&mut self, anchor: Coord2) {
        if matches!(self.mode, Mode::Standard) && !self.board.mines_placed() {
            let generator = RandomMinefieldGenerator::new(self.seed, anchor);
            let layout = generator.generate(self.board.game_config());
            self.board.lay_mines(&layout);
        }
        self.status = GameStatus::Playing;
        self.stopwatch.start(self.clock.now());
        log::info!("Game started at {:?}", anchor);
    }

    /// Opens one cell and flood-fills from it when it has no adjacent mines.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.board[coords];
        if !cell.is_hidden() {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine() {
            log::info!("Hit mine at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        self.uncover(coords);
        log::debug!(
            "Open cell at {:?}, mine count: {}",
            coords,
            cell.neighbor_mines()
        );

        if cell.neighbor_mines() == 0 {
            let mut to_visit: VecDeque<_> = self
                .board
                .iter_neighbors(coords)
                .filter(|&pos| self.board[pos].is_hidden())
                .collect();
            log::trace!("Starting flood-fill from {:?}", coords);

            while let Some(visit_coords) = to_visit.pop_front() {
                let visit_cell = self.board[visit_coords];
                // revealed by an earlier entry, or protected by a flag
                if !visit_cell.is_hidden() {
                    continue;
                }
                debug_assert!(!visit_cell.is_mine());

                self.uncover(visit_coords);
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    visit_coords,
                    visit_cell.neighbor_mines()
                );

                if visit_cell.neighbor_mines() == 0 {
                    to_visit.extend(
                        self.board
                            .iter_neighbors(visit_coords)
                            .filter(|&pos| self.board[pos].is_hidden()),
                    );
                }
            }
        }

        RevealOutcome::Revealed
    }

    fn uncover(&mut self, coords: Coord2) {
        self.board.reveal(coords);
        self.revealed_count += 1;
    }

    /// Turns a successful reveal into a win when it completes the goal.
    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if outcome == RevealOutcome::Revealed && self.is_goal_met() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn is_goal_met(&self) -> bool {
        match &self.mode {
            Mode::Standard => self.revealed_count >= self.board.safe_cell_count(),
            Mode::Practice(puzzle) => puzzle.is_goal_met(&self.board),
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        self.stopwatch.stop(self.clock.now());
        if won {
            self.status = GameStatus::Won;
            self.triggered_mine = None;
            log::info!("Game won in {}s", self.elapsed_secs());
        } else {
            self.status = GameStatus::Lost;
            self.board.reveal_mines();
            log::info!("Game lost after {}s", self.elapsed_secs());
        }
    }
}
