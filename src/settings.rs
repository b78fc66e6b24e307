//! Player preferences
//!
//! Persisted separately from the high scores, under their own storage key.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{SETTINGS_KEY, Storage};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded with high scores
    pub player_name: String,
    /// Skip the shield-hit flash
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Name to record, falling back to the default for blank input
    pub fn display_name(&self) -> &str {
        let name = self.player_name.trim();
        if name.is_empty() { "Player" } else { name }
    }

    /// Load settings; anything missing or unreadable yields defaults
    pub fn load<S: Storage + ?Sized>(store: &S) -> Self {
        match store.get_item(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = MemoryStorage::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let settings = Settings {
            player_name: "Vera".into(),
            reduced_motion: true,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_and_malformed_records() {
        let store = MemoryStorage::with_items([(SETTINGS_KEY, r#"{"reduced_motion": true}"#)]);
        let settings = Settings::load(&store);
        assert!(settings.reduced_motion);
        assert_eq!(settings.player_name, "Player");

        let store = MemoryStorage::with_items([(SETTINGS_KEY, "[1, 2")]);
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_blank_name_falls_back() {
        let settings = Settings {
            player_name: "   ".into(),
            ..Settings::default()
        };
        assert_eq!(settings.display_name(), "Player");
    }
}
