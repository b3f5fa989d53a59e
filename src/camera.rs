use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use velocity::game_logic::{chase_camera, RaceSession};

// Window size
pub const WIN_W: f32 = 1280.;
pub const WIN_H: f32 = 720.;

// Menus look down on the whole track
const OVERVIEW_EYE: Vec3 = Vec3::new(0., 60., 70.);

pub fn camera_setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 200.0,
            ..default()
        }),
        DistanceFog {
            color: Color::srgb_u8(0x87, 0xce, 0xeb),
            falloff: FogFalloff::Linear {
                start: 50.0,
                end: 150.0,
            },
            ..default()
        },
        Transform::from_translation(OVERVIEW_EYE).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Chase camera that follows the player car
pub fn move_camera(
    session: Option<Res<RaceSession>>,
    mut camera: Query<&mut Transform, With<Camera3d>>,
) {
    let Some(session) = session else {
        return;
    };
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };

    let (eye, target) = chase_camera(session.state().player_angle, session.config().track_radius);
    *transform = Transform::from_translation(eye).looking_at(target, Vec3::Y);
}

// Reset camera position for the title and results screens
pub fn reset_camera_for_menus(mut camera: Query<&mut Transform, With<Camera3d>>) {
    if let Ok(mut transform) = camera.single_mut() {
        *transform = Transform::from_translation(OVERVIEW_EYE).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
