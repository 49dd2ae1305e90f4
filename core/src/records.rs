use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the best-time mapping lives under.
pub const BEST_TIMES_KEY: &str = "sweeplab:best-times";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("Stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value persistence supplied by the host (browser local storage, a
/// directory of files, a test fake).
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile storage, useful for tests and for hosts without persistence.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.into(), value.into());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Result of handing a winning time to the tracker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The time beat the stored one, or nothing was stored yet.
    NewRecord { previous: Option<u32> },
    /// The stored time stands.
    NoRecord { best: u32 },
}

impl RecordOutcome {
    pub const fn is_new_record(self) -> bool {
        matches!(self, Self::NewRecord { .. })
    }
}

/// Lowest winning time per difficulty key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestTimes {
    records: BTreeMap<String, u32>,
}

impl BestTimes {
    /// Reads the mapping from `storage`; a missing, unreadable or corrupt value gives an empty one.
    pub fn load(storage: &impl KeyValueStorage) -> Self {
        let raw = match storage.read(BEST_TIMES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                log::warn!("Could not read best times, starting empty: {}", err);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(best_times) => best_times,
            Err(err) => {
                log::warn!("Ignoring corrupt best times: {}", err);
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.records.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.records.iter().map(|(key, &secs)| (key.as_str(), secs))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compares a winning time with the record for `key` and persists it when strictly lower.
    ///
    /// A failed write is logged; the new record is still kept in memory and reported.
    pub fn submit(
        &mut self,
        storage: &mut impl KeyValueStorage,
        key: &str,
        secs: u32,
    ) -> RecordOutcome {
        let previous = self.get(key);
        if let Some(best) = previous.filter(|&best| secs >= best) {
            log::debug!("{}s does not beat {}s on {}", secs, best, key);
            return RecordOutcome::NoRecord { best };
        }

        self.records.insert(key.into(), secs);
        log::info!("New best time on {}: {}s (was {:?})", key, secs, previous);
        if let Err(err) = self.save(storage) {
            log::error!("Could not save best times to storage: {}", err);
        }
        RecordOutcome::NewRecord { previous }
    }

    fn save(&self, storage: &mut impl KeyValueStorage) -> Result<(), StorageError> {
        let raw = serde_json::to_string(self)?;
        storage.write(BEST_TIMES_KEY, &raw)
    }
}
