use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{is_advancing_kick, is_ball_approach, is_defensive_positioning, is_goal_kick, is_supporting_pass};
use crate::agent::{random_legal_move, Agent};
use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move};
use crate::state::{GameState, Level, Team};

/// Priority: goal > advancing > supporting pass (level >= 2) > ball
/// approach > defensive > random.
pub struct BasicHeuristicAgent {
    name: String,
    rng: StdRng,
}

impl BasicHeuristicAgent {
    pub fn new(name: impl Into<String>) -> BasicHeuristicAgent {
        BasicHeuristicAgent { name: name.into(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> BasicHeuristicAgent {
        BasicHeuristicAgent { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }

    fn rank(&self, state: &GameState, mv: Move, team: Team) -> u8 {
        if is_goal_kick(state, mv, team) {
            5
        } else if is_advancing_kick(state, mv, team) {
            4
        } else if state.level != Level::One && is_supporting_pass(state, mv, team) {
            3
        } else if is_ball_approach(state, mv) {
            2
        } else if is_defensive_positioning(state, mv, team) {
            1
        } else {
            0
        }
    }
}

impl Agent for BasicHeuristicAgent {
    fn choose(&mut self, state: &GameState, _deadline: Instant) -> Result<Move> {
        let moves = legal_moves(state);
        if moves.is_empty() {
            return Err(MastergoalError::invalid_input("no legal moves available"));
        }
        let team = state.current_team;
        let best = moves.iter().map(|&m| self.rank(state, m, team)).max().unwrap();
        let top: Vec<Move> = moves.iter().copied().filter(|&m| self.rank(state, m, team) == best).collect();
        use rand::seq::SliceRandom;
        top.choose(&mut self.rng)
            .copied()
            .ok_or_else(|| MastergoalError::invalid_input("no candidate moves"))
            .or_else(|_| random_legal_move(state, &mut self.rng))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_heuristic_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::Two);
        let mut agent = BasicHeuristicAgent::with_seed("basic", 1);
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }
}
