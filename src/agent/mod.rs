//! Agent interface. Component E.
//!
//! A single polymorphic contract shared by heuristic agents, the minimax
//! engine and the MCTS engine (components F, G, H).

pub mod heuristics;
pub mod minimax;
pub mod mcts;
mod random;

pub use random::RandomAgent;

use std::time::Instant;

use rand::seq::SliceRandom;

use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move};
use crate::state::{GameState, Team};

/// Implementations must never mutate the passed state, and must return a
/// move inside the legal set; if they cannot decide in time they fall back
/// to [`random_legal_move`].
pub trait Agent {
    /// Chooses a move for `state.current_team` to play before `deadline`.
    fn choose(&mut self, state: &GameState, deadline: Instant) -> Result<Move>;

    /// Called once before a game begins, with the side this agent plays.
    fn on_game_start(&mut self, _side: Team) {}

    /// Called once after a game concludes.
    fn on_game_end(&mut self) {}

    /// Human- or log-friendly identifier, used in agent-failure diagnostics.
    fn name(&self) -> &str;
}

/// Picks uniformly among the legal moves for `state.current_team`. Used as
/// the fallback of last resort (error kind 3: agent failure) and by
/// [`RandomAgent`] itself.
pub fn random_legal_move(state: &GameState, rng: &mut impl rand::Rng) -> Result<Move> {
    let moves = legal_moves(state);
    moves
        .choose(rng)
        .copied()
        .ok_or_else(|| MastergoalError::invalid_input("no legal moves available"))
}

/// Runs `agent.choose`, substituting a uniformly random legal move and
/// logging a warning if the agent fails to produce one -- the recovery
/// policy for error kind 3 (agent failure).
pub fn choose_or_fallback(agent: &mut dyn Agent, state: &GameState, deadline: Instant) -> Result<Move> {
    match agent.choose(state, deadline) {
        Ok(mv) => Ok(mv),
        Err(e) => {
            log::warn!("agent {} failed to choose a move ({}), falling back to random", agent.name(), e);
            let mut rng = rand::thread_rng();
            random_legal_move(state, &mut rng)
        }
    }
}
