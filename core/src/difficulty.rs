use serde::{Deserialize, Serialize};

use crate::*;

/// Named board configuration. The key also identifies the best-time record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub key: String,
    #[serde(flatten)]
    pub config: GameConfig,
}

impl Difficulty {
    pub const BEGINNER: &'static str = "beginner";
    pub const INTERMEDIATE: &'static str = "intermediate";
    pub const EXPERT: &'static str = "expert";

    pub fn new(key: impl Into<String>, size: Coord2, mines: CellCount) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            config: GameConfig::new(size, mines)?,
        })
    }

    pub fn beginner() -> Self {
        Self::preset(Self::BEGINNER, (9, 9), 10)
    }

    pub fn intermediate() -> Self {
        Self::preset(Self::INTERMEDIATE, (16, 16), 40)
    }

    pub fn expert() -> Self {
        Self::preset(Self::EXPERT, (16, 30), 99)
    }

    /// The three canonical presets, smallest first.
    pub fn presets() -> [Self; 3] {
        [Self::beginner(), Self::intermediate(), Self::expert()]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::presets().into_iter().find(|preset| preset.key == key)
    }

    fn preset(key: &str, size: Coord2, mines: CellCount) -> Self {
        Self {
            key: key.into(),
            config: GameConfig::new_unchecked(size, mines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_presets_are_valid() {
        for preset in Difficulty::presets() {
            preset.config.validate().unwrap();
        }
        assert_eq!(Difficulty::expert().config.size, (16, 30));
        assert_eq!(Difficulty::expert().config.mines, 99);
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(Difficulty::from_key("intermediate"), Some(Difficulty::intermediate()));
        assert_eq!(Difficulty::from_key("nightmare"), None);
    }

    #[test]
    fn custom_preset_is_checked() {
        assert!(Difficulty::new("tiny", (2, 2), 4).is_err());
        assert_eq!(Difficulty::new("tiny", (2, 2), 1).unwrap().config.safe_cells(), 3);
    }
}
