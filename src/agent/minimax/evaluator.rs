//! Linear evaluator: a fixed feature vector dotted with a weights vector
//! loaded from a persisted evolutionary-search artifact (see
//! [`super::weights`]).

use crate::agent::heuristics::{column_centrality, count_within, nearest_teammate_distance, row_distance_to_goal};
use crate::state::{GameState, Team};

/// Feature order is fixed per level; changing it invalidates any weights
/// file previously trained against it. See [`features`] for the extraction.
pub const FEATURE_COUNT: usize = 8;

/// Extracts the feature vector from `state`, from `team`'s perspective.
pub fn features(state: &GameState, team: Team) -> [f64; FEATURE_COUNT] {
    let opponent = team.opponent();
    let goal_diff = (state.goals_for(team) as f64) - (state.goals_for(opponent) as f64);
    let pass_pressure = state.passes_count as f64 / (state.rules().pass_cap.max(1) as f64);
    let ball_row_term = -(row_distance_to_goal(state.ball.position, team) as f64);
    let own_near_ball = count_within(state.players_of(team), state.ball.position, 3) as f64;
    let opp_near_ball = count_within(state.players_of(opponent), state.ball.position, 3) as f64;
    let zone_control = own_near_ball - opp_near_ball;
    let centrality = column_centrality(state.ball.position) as f64;
    let nearest_own_to_ball = nearest_teammate_distance(state, team, state.ball.position, state.ball.position)
        .map(|d| -(d as f64))
        .unwrap_or(0.0);
    let keeper_in_position = state
        .players_of(team)
        .find(|p| p.is_goalkeeper)
        .map(|p| {
            let area = (state.rules().penalty_area)(team);
            if area.contains(&p.position) { 1.0 } else { 0.0 }
        })
        .unwrap_or(0.0);

    [
        goal_diff,
        -pass_pressure,
        ball_row_term,
        own_near_ball,
        zone_control,
        centrality,
        nearest_own_to_ball,
        keeper_in_position,
    ]
}

/// Dots the extracted feature vector against `weights`, from `team`'s
/// perspective: higher is better for `team`.
pub fn evaluate(state: &GameState, team: Team, weights: &[f64]) -> f64 {
    let feats = features(state, team);
    feats.iter().zip(weights.iter()).map(|(f, w)| f * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Level;

    #[test]
    fn features_has_fixed_length() {
        let state = GameState::new_game(Level::Two);
        assert_eq!(features(&state, Team::Left).len(), FEATURE_COUNT);
    }

    #[test]
    fn a_goal_lead_evaluates_above_a_tied_game() {
        let mut ahead = GameState::new_game(Level::One);
        ahead.left_goals = 1;
        let tied = GameState::new_game(Level::One);
        let weights = vec![1.0; FEATURE_COUNT];
        assert!(evaluate(&ahead, Team::Left, &weights) > evaluate(&tied, Team::Left, &weights));
    }
}
