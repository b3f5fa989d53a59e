use std::sync::Arc;
use std::time::Instant;

use bevy::prelude::*;
use velocity::client::{PendingSubmission, RetryPolicy};
use velocity::game_logic::{CpuDifficulty, RaceConfig, RaceSession, SteerInput, TickOutcome};

use crate::{Backend, GameState};

/// Final numbers shown on the results screen.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RaceResult {
    pub score: u32,
    pub laps: u32,
}

pub fn start_race(mut commands: Commands, difficulty: Res<CpuDifficulty>) {
    let mut rng = rand::rng();
    let session = RaceSession::start(RaceConfig::for_difficulty(*difficulty), &mut rng, Instant::now())
        .or_else(|e| {
            warn!("Invalid race config ({}), using defaults", e);
            RaceSession::start(RaceConfig::default(), &mut rng, Instant::now())
        });
    match session {
        Ok(session) => {
            info!("Race started ({} AI cars, {})", session.agents().len(), difficulty.as_str());
            commands.insert_resource(session);
        }
        Err(e) => error!("Could not start race: {}", e),
    }
}

// Keyboard only touches the steer input; the tick reads it once per frame
pub fn read_steer_input(input: Res<ButtonInput<KeyCode>>, session: Option<ResMut<RaceSession>>) {
    let Some(mut session) = session else {
        return;
    };
    let left = input.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    let right = input.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    session.set_steer(SteerInput::from_keys(left, right));
}

pub fn advance_race(
    mut commands: Commands,
    session: Option<ResMut<RaceSession>>,
    backend: Res<Backend>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut session) = session else {
        return;
    };
    let laps_before = session.state().laps_completed;

    match session.tick(Instant::now()) {
        TickOutcome::Finished { score } => {
            let laps = session.state().laps_completed;
            info!("Race finished: {} lap(s), score {}", laps, score);

            // results never wait on the network
            let pending = match &backend.api {
                Some(api) => PendingSubmission::spawn(Arc::clone(api), score, RetryPolicy::default()),
                None => PendingSubmission::failed(),
            };
            commands.insert_resource(pending);
            commands.insert_resource(RaceResult { score, laps });
            next_state.set(GameState::Victory);
        }
        TickOutcome::Running if session.state().laps_completed > laps_before => {
            info!("Lap complete {}", session.state().laps_completed);
        }
        _ => {}
    }
}

// Escape abandons the race without submitting anything
pub fn check_for_abandon(
    input: Res<ButtonInput<KeyCode>>,
    session: Option<ResMut<RaceSession>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.just_pressed(KeyCode::Escape) {
        return;
    }
    if let Some(mut session) = session {
        session.stop();
    }
    info!("Race abandoned");
    next_state.set(GameState::Title);
}

pub fn end_race(mut commands: Commands, session: Option<ResMut<RaceSession>>) {
    if let Some(mut session) = session {
        // leaving mid-race counts as abandoning it
        session.stop();
    }
    commands.remove_resource::<RaceSession>();
}
