use serde::{Deserialize, Serialize};

use crate::*;

/// Engine-wide configuration, typically loaded from TOML:
///
/// ```toml
/// [[presets]]
/// key = "tiny"
/// size = [5, 5]
/// mines = 3
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Named presets on top of the canonical three; a matching key replaces a canonical one.
    pub presets: Vec<Difficulty>,
}

impl EngineSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for preset in &self.presets {
            preset.config.validate()?;
        }
        Ok(())
    }

    /// Every playable preset: canonical ones first, then extra keys in declaration order.
    pub fn difficulties(&self) -> Vec<Difficulty> {
        let mut all: Vec<Difficulty> = Difficulty::presets().into();
        for preset in &self.presets {
            match all.iter_mut().find(|known| known.key == preset.key) {
                Some(known) => {
                    log::warn!("Preset `{}` overrides an existing one", preset.key);
                    *known = preset.clone();
                }
                None => all.push(preset.clone()),
            }
        }
        all
    }

    pub fn difficulty(&self, key: &str) -> Result<Difficulty> {
        self.difficulties()
            .into_iter()
            .find(|preset| preset.key == key)
            .ok_or_else(|| GameError::UnknownDifficulty(key.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_use_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.difficulties(), Difficulty::presets().to_vec());
    }

    #[test]
    fn extra_and_overriding_presets() {
        let settings = EngineSettings::from_toml_str(
            r#"
            [[presets]]
            key = "tiny"
            size = [5, 5]
            mines = 3

            [[presets]]
            key = "beginner"
            size = [8, 8]
            mines = 10
            "#,
        )
        .unwrap();

        let keys: Vec<_> = settings.difficulties().into_iter().map(|d| d.key).collect();
        assert_eq!(keys, ["beginner", "intermediate", "expert", "tiny"]);
        assert_eq!(settings.difficulty("beginner").unwrap().config.size, (8, 8));
        assert_eq!(settings.difficulty("tiny").unwrap().config.mines, 3);
        assert!(matches!(
            settings.difficulty("huge"),
            Err(GameError::UnknownDifficulty(key)) if key == "huge"
        ));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let too_many = "[[presets]]\nkey = \"full\"\nsize = [2, 2]\nmines = 4\n";
        assert!(matches!(
            EngineSettings::from_toml_str(too_many),
            Err(GameError::TooManyMines)
        ));
        assert!(matches!(
            EngineSettings::from_toml_str("[[presets]]\nkey = 3\n"),
            Err(GameError::Settings(_))
        ));
    }

    #[test]
    fn first_click_policy_is_not_configurable() {
        for policy in ["random", "simple-safe", "always-zero"] {
            let raw = format!("start_tile = \"{policy}\"");
            assert!(matches!(
                EngineSettings::from_toml_str(&raw),
                Err(GameError::Settings(_))
            ));
        }
    }
}
