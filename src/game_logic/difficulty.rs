// src/game_logic/difficulty.rs
use bevy::prelude::*;

use crate::game_logic::BASE_SPEED;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CpuDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl CpuDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuDifficulty::Easy => "Easy",
            CpuDifficulty::Medium => "Medium",
            CpuDifficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(CpuDifficulty::Easy),
            "medium" => Some(CpuDifficulty::Medium),
            "hard" => Some(CpuDifficulty::Hard),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            CpuDifficulty::Easy => CpuDifficulty::Medium,
            CpuDifficulty::Medium => CpuDifficulty::Hard,
            CpuDifficulty::Hard => CpuDifficulty::Easy,
        }
    }

    /// Angular speed range AI cars draw from, relative to the player's base speed.
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            CpuDifficulty::Easy => (BASE_SPEED * 0.6, BASE_SPEED * 0.85),
            CpuDifficulty::Medium => (BASE_SPEED * 0.8, BASE_SPEED * 1.05),
            CpuDifficulty::Hard => (BASE_SPEED * 0.95, BASE_SPEED * 1.3),
        }
    }
}
