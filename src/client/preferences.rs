//! Cosmetic preferences kept between runs. Never read by scoring.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preferences io: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences format: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CarColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl CarColor {
    pub const ALL: [CarColor; 5] = [
        CarColor::Red,
        CarColor::Blue,
        CarColor::Green,
        CarColor::Yellow,
        CarColor::Purple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarColor::Red => "red",
            CarColor::Blue => "blue",
            CarColor::Green => "green",
            CarColor::Yellow => "yellow",
            CarColor::Purple => "purple",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn color(&self) -> Color {
        match self {
            CarColor::Red => Color::srgb(0.85, 0.1, 0.1),
            CarColor::Blue => Color::srgb(0.1, 0.3, 0.9),
            CarColor::Green => Color::srgb(0.1, 0.7, 0.2),
            CarColor::Yellow => Color::srgb(0.95, 0.85, 0.1),
            CarColor::Purple => Color::srgb(0.55, 0.2, 0.8),
        }
    }
}

#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Preferences {
    pub car_color: CarColor,
}

impl Preferences {
    /// Missing or unreadable files fall back to defaults.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(prefs) => prefs,
            Err(PreferencesError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                warn!("ignoring preferences at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, PreferencesError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
