use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use velocity::client::Preferences;
use velocity::game_logic::{
    car_rotation, position_on_track, AIControlled, Car, PlayerControlled, RaceSession, TRACK_RADIUS,
    TRACK_WIDTH,
};

// Car body dimensions
const CAR_WIDTH: f32 = 1.8;
const CAR_HEIGHT: f32 = 0.7;
const CAR_LENGTH: f32 = 4.0;
const AI_COLOR: Color = Color::srgb(0.6, 0.6, 0.65);

/// Road ring, grass and lights. Spawned once at startup.
pub fn spawn_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(300.0, 300.0))),
        MeshMaterial3d(materials.add(Color::srgb_u8(0x00, 0x64, 0x00))),
        Transform::from_xyz(0., -0.01, 0.),
    ));

    // Annulus is built in the XY plane; lay it flat
    commands.spawn((
        Mesh3d(meshes.add(Annulus::new(
            TRACK_RADIUS - TRACK_WIDTH / 2.0,
            TRACK_RADIUS + TRACK_WIDTH / 2.0,
        ))),
        MeshMaterial3d(materials.add(Color::srgb_u8(0x44, 0x44, 0x44))),
        Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10., 20., 5.).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
        ..default()
    });
}

fn spawn_car_body(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    color: Color,
) -> Entity {
    let body = meshes.add(Cuboid::new(CAR_WIDTH, CAR_HEIGHT, CAR_LENGTH));
    let cabin = meshes.add(Cuboid::new(CAR_WIDTH * 0.8, CAR_HEIGHT * 0.8, CAR_LENGTH * 0.45));
    let paint = materials.add(StandardMaterial {
        base_color: color,
        ..default()
    });
    let glass = materials.add(Color::srgba(0.1, 0.1, 0.15, 0.9));

    commands
        .spawn((
            Mesh3d(body),
            MeshMaterial3d(paint),
            Transform::default(),
            Car,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(cabin),
                MeshMaterial3d(glass),
                Transform::from_xyz(0., CAR_HEIGHT * 0.8, CAR_LENGTH * 0.1),
            ));
        })
        .id()
}

// Player car in the preferred color plus one car per AI agent
pub fn spawn_cars(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    prefs: Res<Preferences>,
    session: Option<Res<RaceSession>>,
) {
    let Some(session) = session else {
        return;
    };
    let player = spawn_car_body(&mut commands, &mut meshes, &mut materials, prefs.car_color.color());
    commands.entity(player).insert(PlayerControlled);

    for index in 0..session.agents().len() {
        let ai = spawn_car_body(&mut commands, &mut meshes, &mut materials, AI_COLOR);
        commands.entity(ai).insert(AIControlled { index });
    }
}

// Place every car from its angle on the track
pub fn sync_car_transforms(
    session: Option<Res<RaceSession>>,
    mut player: Query<&mut Transform, (With<PlayerControlled>, Without<AIControlled>)>,
    mut ai_cars: Query<(&mut Transform, &AIControlled), Without<PlayerControlled>>,
) {
    let Some(session) = session else {
        return;
    };
    let radius = session.config().track_radius;
    let lift = Vec3::Y * CAR_HEIGHT / 2.0;

    if let Ok(mut transform) = player.single_mut() {
        let angle = session.state().player_angle;
        transform.translation = position_on_track(angle, radius) + lift;
        transform.rotation = car_rotation(angle);
    }

    for (mut transform, ai) in ai_cars.iter_mut() {
        if let Some(agent) = session.agents().get(ai.index) {
            transform.translation =
                position_on_track(agent.angle, radius + agent.radial_offset) + lift;
            transform.rotation = car_rotation(agent.angle);
        }
    }
}

pub fn despawn_cars(mut commands: Commands, cars: Query<Entity, With<Car>>) {
    for entity in cars.iter() {
        commands.entity(entity).despawn();
    }
}
