use std::time::Instant;

use bevy::prelude::*;
use rand::Rng;

use crate::game_logic::{
    AIAgent, ConfigError, LapCounter, RaceConfig, RaceState, RaceStatus, SteerInput, advance_agents,
    advance_player, progress, score_at,
};

/// Advance a race by one frame. Finished races are returned untouched.
pub fn step(state: RaceState, config: &RaceConfig, now: Instant) -> RaceState {
    if state.status == RaceStatus::Finished {
        return state;
    }

    let mut next = state;
    let mut laps = LapCounter::new(state.laps_completed);

    let moved = advance_player(state.player_angle, state.steer, config);
    next.player_angle = laps.observe(moved);
    next.laps_completed = laps.laps_completed;

    let elapsed = now.saturating_duration_since(state.started_at);
    next.current_score = score_at(progress(next.player_angle), next.laps_completed, elapsed);

    if laps.is_complete(config.total_laps) {
        next.status = RaceStatus::Finished;
    }
    next
}

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Emitted once, on the frame the race completes.
    Finished { score: u32 },
    /// Already finished or stopped; nothing was updated.
    Idle,
}

/// One race from start to finish, owning all per-race state.
#[derive(Resource, Debug, Clone)]
pub struct RaceSession {
    state: RaceState,
    agents: Vec<AIAgent>,
    config: RaceConfig,
    stopped: bool,
}

impl RaceSession {
    /// Fails if the config breaks the one-wrap-per-frame precondition.
    pub fn new(
        config: RaceConfig,
        agents: Vec<AIAgent>,
        started_at: Instant,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            state: RaceState::new(started_at),
            agents,
            config: config.validate()?,
            stopped: false,
        })
    }

    /// Start a race with one AI car per configured lane.
    pub fn start<R: Rng + ?Sized>(
        config: RaceConfig,
        rng: &mut R,
        started_at: Instant,
    ) -> Result<Self, ConfigError> {
        let agents = config
            .ai_lanes
            .iter()
            .map(|&lane| AIAgent::spawn(rng, config.ai_speed_range, lane))
            .collect();
        Self::new(config, agents, started_at)
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn agents(&self) -> &[AIAgent] {
        &self.agents
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        !self.stopped && self.state.is_running()
    }

    pub fn set_steer(&mut self, steer: SteerInput) {
        self.state.steer = steer;
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Idle;
        }

        advance_agents(&mut self.agents);
        self.state = step(self.state, &self.config, now);

        match self.state.status {
            RaceStatus::Running => TickOutcome::Running,
            RaceStatus::Finished => TickOutcome::Finished {
                score: self.state.current_score,
            },
        }
    }

    /// Abandon the race. Later ticks are idle and no final score is emitted.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
