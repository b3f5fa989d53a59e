mod camera;
mod car;
mod hud;
mod race;
mod title_screen;
mod victory_screen;

use std::sync::Arc;

use bevy::{prelude::*, window::PresentMode};
use velocity::client::config::REQUEST_TIMEOUT;
use velocity::client::{ApiClient, ClientConfig, Preferences, ScoreApi};
use velocity::game_logic::FIXED_HZ;

use camera::{camera_setup, move_camera, reset_camera_for_menus, WIN_H, WIN_W};
use car::{despawn_cars, spawn_cars, spawn_track, sync_car_transforms};
use hud::{despawn_hud, spawn_hud, update_hud};
use race::{advance_race, check_for_abandon, end_race, read_steer_input, start_race};
use title_screen::{check_for_title_input, setup_title_screen, TitleScreenEntity};
use victory_screen::{check_for_victory_input, setup_victory_screen, update_best_score, VictoryScreenEntity};

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Victory,
}

/// Backend handle shared with submission threads. `None` means offline.
#[derive(Resource, Clone, Default)]
pub struct Backend {
    pub api: Option<Arc<dyn ScoreApi>>,
    /// Last best score the backend reported for this player.
    pub best_score: Option<u64>,
}

#[derive(Resource)]
pub struct ClientSettings(pub ClientConfig);

fn main() {
    let config = ClientConfig::from_env();
    let prefs = Preferences::load(&config.prefs_path);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Velocity".into(),
                resolution: (WIN_W, WIN_H).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb_u8(0x87, 0xce, 0xeb)))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ)) // one race tick per fixed step
        .insert_resource(config.difficulty)
        .insert_resource(prefs)
        .insert_resource(ClientSettings(config))
        .init_resource::<Backend>()
        .init_state::<GameState>()
        .add_systems(Startup, (connect_backend, camera_setup, spawn_track))
        .add_systems(OnEnter(GameState::Title), (reset_camera_for_menus, setup_title_screen))
        .add_systems(
            Update,
            check_for_title_input.run_if(in_state(GameState::Title)),
        )
        .add_systems(OnExit(GameState::Title), despawn_all::<TitleScreenEntity>)
        .add_systems(
            OnEnter(GameState::Playing),
            (start_race, spawn_cars, spawn_hud).chain(),
        )
        .add_systems(
            Update,
            (
                read_steer_input,
                check_for_abandon,
                sync_car_transforms,
                move_camera.after(sync_car_transforms),
                update_hud,
            )
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            FixedUpdate,
            advance_race.run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            OnExit(GameState::Playing),
            (end_race, despawn_cars, despawn_hud),
        )
        .add_systems(
            OnEnter(GameState::Victory),
            (reset_camera_for_menus, setup_victory_screen),
        )
        .add_systems(
            Update,
            (update_best_score, check_for_victory_input).run_if(in_state(GameState::Victory)),
        )
        .add_systems(OnExit(GameState::Victory), despawn_all::<VictoryScreenEntity>)
        .run();
}

// Sign in once at startup; failures leave the client offline
fn connect_backend(settings: Res<ClientSettings>, mut backend: ResMut<Backend>) {
    let config = &settings.0;
    let mut client = match ApiClient::new(&config.api_url, REQUEST_TIMEOUT) {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not create HTTP client: {}", e);
            return;
        }
    };

    match client.connect(&config.credentials) {
        Ok(Some(best)) => {
            info!("Signed in to {} (best score {})", config.api_url, best);
            backend.best_score = Some(best);
        }
        Ok(None) => {
            info!("No credentials configured, playing offline");
            return;
        }
        // keep a configured token; the backend may be up by the finish line
        Err(e) if e.is_transient() && client.token().is_some() => {
            warn!("Backend unreachable, will retry at the finish: {}", e);
        }
        Err(e) => {
            warn!("Sign-in failed, scores will not be saved: {}", e);
            return;
        }
    }

    backend.api = Some(Arc::new(client));
}

pub fn despawn_all<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
