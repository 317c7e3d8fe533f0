//! Reader preferences such as the color theme

use crate::error::{CbookError, Result};
use crate::storage::{read_json, write_json, StorageProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage key of the preferences document
pub const PREFERENCES_KEY: &str = "preferences.json";

const MIN_FONT_SCALE: f32 = 0.75;
const MAX_FONT_SCALE: f32 = 2.0;

/// Color theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host's preference
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

impl FromStr for Theme {
    type Err = CbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" | "auto" => Ok(Theme::System),
            other => Err(CbookError::Preference(format!("unknown theme '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub font_scale: f32,
    pub show_line_numbers: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            font_scale: 1.0,
            show_line_numbers: true,
        }
    }
}

impl Preferences {
    /// Load saved preferences, falling back to defaults
    pub async fn load(storage: &dyn StorageProvider) -> Self {
        match read_json::<Preferences>(storage, PREFERENCES_KEY).await {
            Ok(Some(prefs)) => prefs.normalized(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to load preferences, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub async fn save(&self, storage: &dyn StorageProvider) -> Result<()> {
        Ok(write_json(storage, PREFERENCES_KEY, self).await?)
    }

    /// Set the font scale, clamped to the supported range
    pub fn set_font_scale(&mut self, scale: f32) {
        self.font_scale = if scale.is_finite() {
            scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE)
        } else {
            1.0
        };
    }

    fn normalized(mut self) -> Self {
        self.set_font_scale(self.font_scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("auto".parse::<Theme>().unwrap(), Theme::System);

        let err = "sepia".parse::<Theme>().unwrap_err();
        assert!(matches!(err, CbookError::Preference(_)));
        assert_eq!(err.to_string(), "Invalid preference: unknown theme 'sepia'");
    }

    #[test]
    fn test_font_scale_clamped() {
        let mut prefs = Preferences::default();
        prefs.set_font_scale(5.0);
        assert_eq!(prefs.font_scale, 2.0);
        prefs.set_font_scale(f32::NAN);
        assert_eq!(prefs.font_scale, 1.0);
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(Preferences::load(&storage).await, Preferences::default());

        let prefs = Preferences {
            theme: Theme::Dark,
            ..Preferences::default()
        };
        prefs.save(&storage).await.unwrap();
        assert_eq!(Preferences::load(&storage).await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_partial_document_uses_defaults() {
        let storage = MemoryStorage::new();
        storage
            .write(PREFERENCES_KEY, br#"{"theme": "light", "font_scale": 9.0}"#.to_vec())
            .await
            .unwrap();

        let prefs = Preferences::load(&storage).await;
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.font_scale, 2.0);
        assert!(prefs.show_line_numbers);
    }
}
