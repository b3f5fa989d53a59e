use bevy::prelude::*;

use crate::game_logic::{CAMERA_DISTANCE, CAMERA_HEIGHT};

/// World position for an angle on a circle of `radius`, on the ground plane.
pub fn position_on_track(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Direction of travel for increasing angle.
pub fn heading(angle: f32) -> Vec3 {
    Vec3::new(-angle.sin(), 0.0, angle.cos())
}

/// Rotation that points a model's -Z forward axis along the heading.
pub fn car_rotation(angle: f32) -> Quat {
    let dir = heading(angle);
    Quat::from_rotation_y(f32::atan2(-dir.x, -dir.z))
}

/// Eye and target of the chase camera following a car.
pub fn chase_camera(angle: f32, radius: f32) -> (Vec3, Vec3) {
    let target = position_on_track(angle, radius);
    let eye = target - heading(angle) * CAMERA_DISTANCE + Vec3::Y * CAMERA_HEIGHT;
    (eye, target)
}
