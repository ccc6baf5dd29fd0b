use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{random_legal_move, Agent};
use crate::error::Result;
use crate::movegen::Move;
use crate::state::GameState;

/// Picks a uniformly random legal move. The baseline opponent every other
/// agent must be able to interoperate with via the common [`Agent`]
/// contract, and the fallback every other agent degrades to on failure.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> RandomAgent {
        RandomAgent { name: name.into(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> RandomAgent {
        RandomAgent { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }
}

impl Agent for RandomAgent {
    fn choose(&mut self, state: &GameState, _deadline: Instant) -> Result<Move> {
        random_legal_move(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Level;

    #[test]
    fn random_agent_always_returns_a_legal_move() {
        let state = GameState::new_game(Level::One);
        let mut agent = RandomAgent::with_seed("random", 7);
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(crate::movegen::legal_moves(&state).contains(&mv));
    }
}
