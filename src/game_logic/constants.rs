// Track timing
pub const FIXED_HZ: f64 = 60.0; // one race tick per fixed update

/// One lap of the track's angular parametrization.
pub const FULL_TURN: f32 = std::f32::consts::TAU;

// Motion constants (radians per tick)
pub const BASE_SPEED: f32 = 0.01;
pub const STEER_COEFFICIENT: f32 = 0.004;
pub const TOTAL_LAPS: u32 = 1;

// Scoring weights
pub const POINTS_PER_LAP: f64 = 10_000.0;
pub const TIME_PENALTY_PER_SECOND: f64 = 5.0;

// Track geometry (world units)
pub const TRACK_RADIUS: f32 = 30.0;
pub const TRACK_WIDTH: f32 = 14.0;
pub const AI_LANES: [f32; 3] = [-4.0, 4.0, -2.0];

// Chase camera offset behind and above the car
pub const CAMERA_DISTANCE: f32 = 10.0;
pub const CAMERA_HEIGHT: f32 = 5.0;
