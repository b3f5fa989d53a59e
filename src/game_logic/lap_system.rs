use crate::game_logic::FULL_TURN;

/// Counts full turns of the player's angle and keeps it in `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LapCounter {
    pub laps_completed: u32,
}

impl LapCounter {
    pub fn new(laps_completed: u32) -> Self {
        Self { laps_completed }
    }

    /// Unwrap at most one turn. Callers guarantee the per-frame delta
    /// is below a full turn (see `RaceConfig::validate`).
    pub fn observe(&mut self, angle: f32) -> f32 {
        debug_assert!(
            (0.0..2.0 * FULL_TURN).contains(&angle),
            "angle {angle} moved more than one turn in a frame"
        );
        if angle >= FULL_TURN {
            self.laps_completed += 1;
            angle - FULL_TURN
        } else {
            angle
        }
    }

    pub fn is_complete(&self, total_laps: u32) -> bool {
        self.laps_completed >= total_laps
    }
}

/// Fraction of the current lap, in `[0, 1)`.
pub fn progress(angle: f32) -> f64 {
    let fraction = (angle.rem_euclid(FULL_TURN) / FULL_TURN) as f64;
    // rem_euclid can round up to exactly one turn for tiny negatives
    if fraction >= 1.0 { 0.0 } else { fraction }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_lap_below_full_turn() {
        let mut laps = LapCounter::default();
        let angle = laps.observe(FULL_TURN - 0.001);
        assert_eq!(laps.laps_completed, 0);
        assert_eq!(angle, FULL_TURN - 0.001);
    }

    #[test]
    fn test_crossing_wraps_and_counts() {
        let mut laps = LapCounter::default();
        let angle = laps.observe(FULL_TURN + 0.25);
        assert_eq!(laps.laps_completed, 1);
        assert!((angle - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_exact_full_turn_wraps_to_zero() {
        let mut laps = LapCounter::default();
        let angle = laps.observe(FULL_TURN);
        assert_eq!(laps.laps_completed, 1);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(progress(0.0), 0.0);
        assert!((progress(std::f32::consts::PI) - 0.5).abs() < 1e-6);
        assert!(progress(FULL_TURN - 1e-4) < 1.0);
    }

    #[test]
    fn test_completion() {
        let laps = LapCounter::new(1);
        assert!(laps.is_complete(1));
        assert!(!laps.is_complete(2));
    }
}
