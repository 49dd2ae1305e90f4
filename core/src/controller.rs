use crate::*;

/// What a new session is built from.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionSource {
    /// Key of a canonical or configured preset.
    Difficulty(String),
    Puzzle(PracticePuzzle),
}

/// How a game ended, reported once on the action that ended it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Finish {
    pub status: GameStatus,
    pub elapsed_secs: u32,
    /// Best-time comparison, only for won games with a difficulty key.
    pub record: Option<RecordOutcome>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionReport<T> {
    pub outcome: T,
    pub finished: Option<Finish>,
}

impl<T> ActionReport<T> {
    fn unfinished(outcome: T) -> Self {
        Self {
            outcome,
            finished: None,
        }
    }
}

/// Owns the current session and the best-time records, and hands winning times
/// to the tracker.
pub struct GameController<S: KeyValueStorage, C: Clock + Clone = SystemClock> {
    settings: EngineSettings,
    storage: S,
    best_times: BestTimes,
    clock: C,
    session: Option<Session<C>>,
}

impl<S: KeyValueStorage, C: Clock + Clone> GameController<S, C> {
    pub fn new(settings: EngineSettings, storage: S, clock: C) -> Self {
        let best_times = BestTimes::load(&storage);
        Self {
            settings,
            storage,
            best_times,
            clock,
            session: None,
        }
    }

    /// Replaces the current session, if any, with a fresh one.
    pub fn new_session(&mut self, source: SessionSource) -> Result<&Session<C>> {
        let session = match source {
            SessionSource::Difficulty(key) => {
                let difficulty = self.settings.difficulty(&key)?;
                log::info!("New {} game", difficulty.key);
                Session::new(difficulty, self.clock.clone())?
            }
            SessionSource::Puzzle(puzzle) => {
                log::info!("New practice puzzle, goal {:?} at {:?}", puzzle.goal, puzzle.target);
                Session::practice(puzzle, self.clock.clone())?
            }
        };
        self.best_times = BestTimes::load(&self.storage);
        Ok(&*self.session.insert(session))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn session(&self) -> Option<&Session<C>> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    pub fn best_times(&self) -> &BestTimes {
        &self.best_times
    }

    pub fn best_time(&self, key: &str) -> Option<u32> {
        self.best_times.get(key)
    }

    pub fn reveal(&mut self, coords: Coord2) -> ActionReport<RevealOutcome> {
        self.act(|session| session.reveal(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> ActionReport<MarkOutcome> {
        self.act(|session| session.toggle_flag(coords))
    }

    pub fn auto_reveal(&mut self, coords: Coord2) -> ActionReport<RevealOutcome> {
        self.act(|session| session.auto_reveal(coords))
    }

    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }

    fn act<T: Default>(&mut self, action: impl FnOnce(&mut Session<C>) -> T) -> ActionReport<T> {
        let Some(session) = self.session.as_mut() else {
            log::debug!("No session, ignoring action");
            return ActionReport::unfinished(T::default());
        };

        let was_finished = session.is_finished();
        let outcome = action(&mut *session);
        if was_finished || !session.is_finished() {
            return ActionReport::unfinished(outcome);
        }

        let status = session.status();
        let elapsed_secs = session.elapsed_secs();
        let key = session.difficulty_key().map(str::to_owned);

        let record = match (status, key) {
            (GameStatus::Won, Some(key)) => {
                Some(self.best_times.submit(&mut self.storage, &key, elapsed_secs))
            }
            _ => None,
        };

        ActionReport {
            outcome,
            finished: Some(Finish {
                status,
                elapsed_secs,
                record,
            }),
        }
    }
}
