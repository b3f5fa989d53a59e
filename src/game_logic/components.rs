use std::time::Instant;

use bevy::prelude::*;
use rand::Rng;

/// Marker for any rendered car.
#[derive(Component)]
pub struct Car;

#[derive(Component)]
pub struct PlayerControlled;

/// Rendered AI car, indexing into the session's agent list.
#[derive(Component)]
pub struct AIControlled {
    pub index: usize,
}

/// Steering read once per frame by the motion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteerInput {
    Left,
    Right,
    #[default]
    None,
}

impl SteerInput {
    pub fn axis(self) -> f32 {
        match self {
            SteerInput::Left => -1.0,
            SteerInput::Right => 1.0,
            SteerInput::None => 0.0,
        }
    }

    /// Resolve two held keys; both or neither cancel out.
    pub fn from_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => SteerInput::Left,
            (false, true) => SteerInput::Right,
            _ => SteerInput::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceStatus {
    Running,
    Finished,
}

/// Everything the frame loop mutates for the player's race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceState {
    pub player_angle: f32,
    pub laps_completed: u32,
    pub steer: SteerInput,
    pub started_at: Instant,
    pub current_score: u32,
    pub status: RaceStatus,
}

impl RaceState {
    pub fn new(started_at: Instant) -> Self {
        Self {
            player_angle: 0.0,
            laps_completed: 0,
            steer: SteerInput::None,
            started_at,
            current_score: 0,
            status: RaceStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RaceStatus::Running
    }
}

/// A computer-driven car sweeping the track at a fixed angular speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AIAgent {
    pub angle: f32,
    pub angular_speed: f32,
    pub radial_offset: f32,
}

impl AIAgent {
    pub fn new(angular_speed: f32, radial_offset: f32) -> Self {
        Self {
            angle: 0.0,
            angular_speed,
            radial_offset,
        }
    }

    /// Spawn with a speed drawn from `[min, max)`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, speed_range: (f32, f32), radial_offset: f32) -> Self {
        let (min, max) = speed_range;
        let angular_speed = if max > min {
            rng.random_range(min..max)
        } else {
            min
        };
        Self::new(angular_speed, radial_offset)
    }
}
