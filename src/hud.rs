use bevy::prelude::*;
use velocity::game_logic::{progress, RaceSession};

#[derive(Component)]
pub struct HudText;

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 26.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));
}

pub fn update_hud(session: Option<Res<RaceSession>>, mut hud: Query<&mut Text, With<HudText>>) {
    let Some(session) = session else {
        return;
    };
    let Ok(mut text) = hud.single_mut() else {
        return;
    };

    let state = session.state();
    text.0 = format!(
        "Lap {}/{}   {:>3.0}%   Score {}",
        (state.laps_completed + 1).min(session.config().total_laps),
        session.config().total_laps,
        progress(state.player_angle) * 100.0,
        state.current_score,
    );
}

pub fn despawn_hud(mut commands: Commands, hud: Query<Entity, With<HudText>>) {
    for entity in hud.iter() {
        commands.entity(entity).despawn();
    }
}
