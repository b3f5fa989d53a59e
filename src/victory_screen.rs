use bevy::prelude::*;
use velocity::client::{PendingSubmission, SubmissionOutcome};

use crate::race::RaceResult;
use crate::{Backend, GameState};

#[derive(Component)]
pub struct VictoryScreenEntity;

#[derive(Component)]
pub struct BestScoreText;

fn results_text(text: impl Into<String>, font_size: f32, top: f32) -> impl Bundle {
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
        VictoryScreenEntity,
    )
}

pub fn setup_victory_screen(mut commands: Commands, result: Option<Res<RaceResult>>) {
    let score = result.map(|r| r.score).unwrap_or(0);

    commands.spawn(results_text("Race Results", 72.0, 80.0));
    commands.spawn(results_text(format!("Your Score: {}", score), 44.0, 220.0));
    commands.spawn((results_text("Best Score: ...", 44.0, 290.0), BestScoreText));
    commands.spawn(results_text("ENTER for title   ESC to quit", 28.0, 420.0));
}

// Fill in the best score once the submission thread reports back
pub fn update_best_score(
    mut commands: Commands,
    pending: Option<ResMut<PendingSubmission>>,
    mut backend: ResMut<Backend>,
    mut text: Query<&mut Text, With<BestScoreText>>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    let Some(outcome) = pending.try_outcome() else {
        return;
    };

    let label = match outcome {
        SubmissionOutcome::Accepted { best_score, .. } => {
            info!("Score saved, best {}", best_score);
            backend.best_score = Some(best_score);
            format!("Best Score: {}", best_score)
        }
        SubmissionOutcome::Failed => "Best Score: \u{2014}".to_string(),
    };
    if let Ok(mut text) = text.single_mut() {
        text.0 = label;
    }
    commands.remove_resource::<PendingSubmission>();
}

pub fn check_for_victory_input(
    input: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if input.just_pressed(KeyCode::Enter) {
        next_state.set(GameState::Title);
    } else if input.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
