//! Uniform-random playout to a terminal state (or a ply cap), scored from
//! one team's perspective. Grounded on `strategies/simulation.py`'s
//! `RandomPlayout`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::exec::apply;
use crate::movegen::legal_moves;
use crate::state::{GameState, Team, Winner};

pub trait SimulationStrategy {
    fn simulate(&self, state: &GameState, rng: &mut impl Rng) -> f64;
}

/// Caps playout length so a pathological position (e.g. a repeated-pass
/// loop under a high cap) can't run unbounded; this does not replace
/// `GameState::is_game_over`'s own turn cap, which the playout also
/// respects via `win_goals`/`max_turns`.
pub struct RandomPlayout {
    pub ai_team: Team,
    pub win_goals: u32,
    pub max_turns: Option<u32>,
    pub max_plies: u32,
}

impl RandomPlayout {
    pub fn new(ai_team: Team, win_goals: u32, max_turns: Option<u32>) -> RandomPlayout {
        RandomPlayout { ai_team, win_goals, max_turns, max_plies: 400 }
    }
}

impl SimulationStrategy for RandomPlayout {
    fn simulate(&self, state: &GameState, rng: &mut impl Rng) -> f64 {
        let mut current = state.clone();
        let mut plies = 0u32;

        loop {
            if let Some(winner) = current.is_game_over(self.win_goals, self.max_turns) {
                return reward_for(winner, self.ai_team);
            }
            if plies >= self.max_plies {
                return 0.0;
            }
            let moves = legal_moves(&current);
            let Some(&mv) = moves.choose(rng) else {
                return 0.0;
            };
            current = match apply(&current, mv) {
                Ok(next) => next,
                Err(_) => return 0.0,
            };
            plies += 1;
        }
    }
}

fn reward_for(winner: Winner, ai_team: Team) -> f64 {
    match winner {
        Winner::Draw => 0.0,
        Winner::Team(t) if t == ai_team => 1.0,
        Winner::Team(_) => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Level;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn simulate_returns_a_value_in_range() {
        let state = GameState::new_game(Level::One);
        let playout = RandomPlayout::new(Team::Left, 1, Some(30));
        let mut rng = StdRng::seed_from_u64(1);
        let reward = playout.simulate(&state, &mut rng);
        assert!((-1.0..=1.0).contains(&reward));
    }
}
