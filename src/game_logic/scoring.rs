use std::time::Duration;

use crate::game_logic::{POINTS_PER_LAP, TIME_PENALTY_PER_SECOND};

/// `max(0, round(10000 * (progress + laps) - elapsed * 5))`
pub fn score(progress: f64, laps_completed: u32, elapsed_secs: f64) -> u32 {
    let raw = POINTS_PER_LAP * (progress + laps_completed as f64)
        - elapsed_secs * TIME_PENALTY_PER_SECOND;
    let rounded = raw.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

pub fn score_at(progress: f64, laps_completed: u32, elapsed: Duration) -> u32 {
    score(progress, laps_completed, elapsed.as_secs_f64())
}
