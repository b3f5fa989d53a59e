use bevy::input::ButtonInput;
use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;
use velocity::client::Preferences;
use velocity::game_logic::CpuDifficulty;

use crate::{Backend, ClientSettings, GameState};

#[derive(Component)]
pub struct TitleScreenEntity;

#[derive(Component)]
pub struct CarColorText;

#[derive(Component)]
pub struct CpuDifficultyText;

fn title_text(text: impl Into<String>, font_size: f32, top: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(top),
            left: Val::Px(80.0),
            ..default()
        },
        TitleScreenEntity,
    )
}

fn car_color_label(prefs: &Preferences) -> String {
    format!("Car: < {} >", prefs.car_color.as_str().to_uppercase())
}

fn difficulty_label(difficulty: CpuDifficulty) -> String {
    format!("CPU: {} (D to change)", difficulty.as_str().to_uppercase())
}

pub fn setup_title_screen(
    mut commands: Commands,
    prefs: Res<Preferences>,
    difficulty: Res<CpuDifficulty>,
    backend: Res<Backend>,
) {
    commands.spawn(title_text("VELOCITY", 96.0, 80.0));
    if let Some(best) = backend.best_score {
        commands.spawn(title_text(format!("Best: {}", best), 32.0, 200.0));
    }
    commands.spawn((title_text(car_color_label(&prefs), 40.0, 260.0), CarColorText));
    commands.spawn((title_text(difficulty_label(*difficulty), 40.0, 320.0), CpuDifficultyText));
    commands.spawn(title_text("ENTER to race   ESC to quit", 28.0, 440.0));
}

pub fn check_for_title_input(
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<ClientSettings>,
    mut prefs: ResMut<Preferences>,
    mut difficulty: ResMut<CpuDifficulty>,
    mut color_text: Query<&mut Text, (With<CarColorText>, Without<CpuDifficultyText>)>,
    mut difficulty_text: Query<&mut Text, (With<CpuDifficultyText>, Without<CarColorText>)>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if input.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Playing);
        return;
    }
    if input.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
        return;
    }

    let color_change = if input.just_pressed(KeyCode::ArrowRight) {
        Some(prefs.car_color.next())
    } else if input.just_pressed(KeyCode::ArrowLeft) {
        Some(prefs.car_color.prev())
    } else {
        None
    };
    if let Some(color) = color_change {
        prefs.car_color = color;
        if let Err(e) = prefs.save(&settings.0.prefs_path) {
            warn!("Could not save preferences: {}", e);
        }
        if let Ok(mut text) = color_text.single_mut() {
            text.0 = car_color_label(&prefs);
        }
    }

    if input.just_pressed(KeyCode::KeyD) {
        *difficulty = difficulty.next();
        if let Ok(mut text) = difficulty_text.single_mut() {
            text.0 = difficulty_label(*difficulty);
        }
    }
}
