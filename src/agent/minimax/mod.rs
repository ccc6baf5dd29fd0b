//! Alpha-beta minimax engine over a linear evaluator. Component G.
//!
//! Grounded on the alpha-beta shape of a material-counting chess minimax:
//! the maximizing side is read off whose turn it is at each node, search
//! stops at a fixed depth or when the position is terminal, and the root
//! loop iterative-deepens, checking the wall-clock deadline between each
//! completed depth rather than mid-search.

pub mod evaluator;
pub mod weights;

use std::time::Instant;

use crate::agent::Agent;
use crate::error::{MastergoalError, Result};
use crate::exec::apply;
use crate::movegen::{legal_moves, Move, MoveKind};
use crate::state::{GameState, Team};
use weights::Weights;

const WIN_GOALS_HORIZON: u32 = 3;

/// Minimax agent driven by a [`Weights`]-loaded linear evaluator.
/// Iterative-deepens from depth 1 up to `weights.depth`, keeping the best
/// move found at the deepest depth fully completed before the deadline.
pub struct MinimaxAgent {
    name: String,
    weights: Weights,
}

impl MinimaxAgent {
    pub fn new(name: impl Into<String>, weights: Weights) -> MinimaxAgent {
        MinimaxAgent { name: name.into(), weights }
    }

    fn ordered_moves(state: &GameState) -> Vec<Move> {
        let mut moves = legal_moves(state);
        // Kicks first (they can end the game or shift possession), then
        // MOVEs that reduce distance to the opponent goal -- a cheap move
        // ordering heuristic to tighten alpha-beta cutoffs.
        let team = state.current_team;
        moves.sort_by_key(|m| {
            let kick_rank = if m.kind == MoveKind::Kick { 0 } else { 1 };
            let advance_rank = -(crate::agent::heuristics::row_distance_to_goal(m.to, team)
                - crate::agent::heuristics::row_distance_to_goal(m.from, team));
            (kick_rank, advance_rank)
        });
        moves
    }

    fn search(&self, state: &GameState, depth: u8, mut alpha: f64, mut beta: f64, root_team: Team) -> Result<f64> {
        if let Some(winner) = state.is_game_over(WIN_GOALS_HORIZON, None) {
            return Ok(terminal_score(winner, root_team));
        }
        if depth == 0 {
            return Ok(evaluator::evaluate(state, root_team, &self.weights.values));
        }

        let moves = Self::ordered_moves(state);
        if moves.is_empty() {
            return Ok(evaluator::evaluate(state, root_team, &self.weights.values));
        }

        let maximizing = state.current_team == root_team;
        if maximizing {
            let mut value = f64::NEG_INFINITY;
            for mv in moves {
                let next = apply(state, mv)?;
                let child = self.search(&next, depth - 1, alpha, beta, root_team)?;
                value = value.max(child);
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            Ok(value)
        } else {
            let mut value = f64::INFINITY;
            for mv in moves {
                let next = apply(state, mv)?;
                let child = self.search(&next, depth - 1, alpha, beta, root_team)?;
                value = value.min(child);
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            Ok(value)
        }
    }

    /// Evaluates every root move at `depth`, checking `deadline` between
    /// each one so a slow depth with many root moves still returns its
    /// best-so-far move instead of overrunning the budget.
    fn best_move_at_depth(&self, state: &GameState, depth: u8, deadline: Instant) -> Result<Move> {
        let root_team = state.current_team;
        let moves = Self::ordered_moves(state);
        let mut best_move = *moves.first().ok_or_else(|| MastergoalError::invalid_input("no legal moves available"))?;
        let mut best_score = f64::NEG_INFINITY;
        let (mut alpha, beta) = (f64::NEG_INFINITY, f64::INFINITY);

        for (i, mv) in moves.into_iter().enumerate() {
            if i > 0 && Instant::now() >= deadline {
                break;
            }
            let next = apply(state, mv)?;
            let score = self.search(&next, depth.saturating_sub(1), alpha, beta, root_team)?;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(best_score);
        }
        Ok(best_move)
    }
}

fn terminal_score(winner: crate::state::Winner, root_team: Team) -> f64 {
    use crate::state::Winner;
    match winner {
        Winner::Draw => 0.0,
        Winner::Team(t) if t == root_team => 1e6,
        Winner::Team(_) => -1e6,
    }
}

impl Agent for MinimaxAgent {
    fn choose(&mut self, state: &GameState, deadline: Instant) -> Result<Move> {
        let moves = legal_moves(state);
        if moves.is_empty() {
            return Err(MastergoalError::invalid_input("no legal moves available"));
        }

        let mut best = moves[0];
        for depth in 1..=self.weights.depth {
            if Instant::now() >= deadline {
                break;
            }
            best = self.best_move_at_depth(state, depth, deadline)?;
            if Instant::now() >= deadline {
                break;
            }
        }
        Ok(best)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Level;
    use std::time::Duration;

    #[test]
    fn minimax_agent_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::One);
        let mut agent = MinimaxAgent::new("minimax", Weights::uniform(2));
        let deadline = Instant::now() + Duration::from_secs(2);
        let mv = agent.choose(&state, deadline).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }

    #[test]
    fn expired_deadline_still_returns_a_legal_move() {
        let state = GameState::new_game(Level::One);
        let mut agent = MinimaxAgent::new("minimax", Weights::uniform(3));
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }
}
