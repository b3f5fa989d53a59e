use thiserror::Error;

use crate::game_logic::{
    BASE_SPEED, CpuDifficulty, FULL_TURN, STEER_COEFFICIENT, TOTAL_LAPS, TRACK_RADIUS,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("base speed must be positive and finite, got {0}")]
    BaseSpeed(f32),
    #[error("steer coefficient {steer} must be in [0, base speed {base}]")]
    SteerCoefficient { steer: f32, base: f32 },
    #[error("max per-frame delta {0} must stay below one full turn")]
    FrameDelta(f32),
    #[error("total laps must be at least 1")]
    TotalLaps,
    #[error("AI speed range ({0}, {1}) is invalid")]
    AiSpeedRange(f32, f32),
}

/// Tuning for one race. Immutable once the session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    pub base_speed: f32,
    pub steer_coefficient: f32,
    pub total_laps: u32,
    pub track_radius: f32,
    pub ai_speed_range: (f32, f32),
    pub ai_lanes: Vec<f32>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::for_difficulty(CpuDifficulty::default())
    }
}

impl RaceConfig {
    pub fn for_difficulty(difficulty: CpuDifficulty) -> Self {
        Self {
            base_speed: BASE_SPEED,
            steer_coefficient: STEER_COEFFICIENT,
            total_laps: TOTAL_LAPS,
            track_radius: TRACK_RADIUS,
            ai_speed_range: difficulty.speed_range(),
            ai_lanes: crate::game_logic::AI_LANES.to_vec(),
        }
    }

    /// Largest angle the player can cover in one frame.
    pub fn max_frame_delta(&self) -> f32 {
        self.base_speed + self.steer_coefficient
    }

    /// Lap tracking unwraps at most one turn per frame and never sees a
    /// negative angle, so the per-frame delta must stay within `[0, 2π)`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return Err(ConfigError::BaseSpeed(self.base_speed));
        }
        if !(self.steer_coefficient >= 0.0 && self.steer_coefficient <= self.base_speed) {
            return Err(ConfigError::SteerCoefficient {
                steer: self.steer_coefficient,
                base: self.base_speed,
            });
        }
        if self.max_frame_delta() >= FULL_TURN {
            return Err(ConfigError::FrameDelta(self.max_frame_delta()));
        }
        if self.total_laps == 0 {
            return Err(ConfigError::TotalLaps);
        }
        let (min, max) = self.ai_speed_range;
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min <= max) {
            return Err(ConfigError::AiSpeedRange(min, max));
        }
        Ok(self)
    }
}
