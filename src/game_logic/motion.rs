use crate::game_logic::{AIAgent, RaceConfig, SteerInput};

/// Advance the player one frame along the track.
/// No bounds check: wrapping belongs to the lap tracker.
pub fn advance_player(angle: f32, steer: SteerInput, config: &RaceConfig) -> f32 {
    angle + config.base_speed + steer.axis() * config.steer_coefficient
}

/// AI cars never wrap; trig periodicity handles placement.
pub fn advance_agent(agent: &mut AIAgent) {
    agent.angle += agent.angular_speed;
}

pub fn advance_agents(agents: &mut [AIAgent]) {
    for agent in agents.iter_mut() {
        advance_agent(agent);
    }
}
