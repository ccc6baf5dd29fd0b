use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{pick_top, row_distance_to_goal};
use crate::agent::Agent;
use crate::board::Position;
use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move, MoveKind};
use crate::state::{GameState, Level, Player, Team};

/// A role assigned once, at game start, from each player's initial cell --
/// not recomputed per-turn, matching the original's fixed role roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

fn role_for(level: Level, _team: Team, player_id: u8, is_goalkeeper: bool) -> Role {
    if is_goalkeeper {
        return Role::Goalkeeper;
    }
    match level {
        Level::One => Role::Forward,
        Level::Two => match player_id {
            0 => Role::Forward,
            _ => Role::Defender,
        },
        // Level 3 field players are ids 0-3; 0-1 started closer to the
        // opponent half (row 4/10), 2-3 started deeper (row 2/12). Both
        // teams mirror the same role table by id, so `team` is unused.
        Level::Three => match player_id {
            0 | 1 => Role::Forward,
            2 => Role::Midfielder,
            _ => Role::Defender,
        },
    }
}

/// Attacking, defending, or a transitional phase read off the ball's row
/// relative to the team's own half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Attacking,
    Defending,
    Transition,
}

fn phase_for(state: &GameState, team: Team) -> Phase {
    let ball_dist_to_own_goal = row_distance_to_goal(state.ball.position, team.opponent());
    let ball_dist_to_opp_goal = row_distance_to_goal(state.ball.position, team);
    if ball_dist_to_opp_goal < ball_dist_to_own_goal {
        Phase::Attacking
    } else if ball_dist_to_own_goal < ball_dist_to_opp_goal {
        Phase::Defending
    } else {
        Phase::Transition
    }
}

fn role_priority(role: Role, phase: Phase, mv: Move, team: Team, state: &GameState) -> i64 {
    match (role, phase) {
        (Role::Forward, Phase::Attacking) if mv.kind == MoveKind::Kick => 5,
        (Role::Forward, _) if is_toward_ball(mv, state) => 3,
        (Role::Midfielder, Phase::Transition) => 3,
        (Role::Defender, Phase::Defending) if is_toward_own_goal_side(mv, team, state) => 4,
        (Role::Goalkeeper, _) => 1,
        _ => 0,
    }
}

fn is_toward_ball(mv: Move, state: &GameState) -> bool {
    mv.kind == MoveKind::Move && mv.to.distance(&state.ball.position) < mv.from.distance(&state.ball.position)
}

fn is_toward_own_goal_side(mv: Move, team: Team, state: &GameState) -> bool {
    mv.kind == MoveKind::Move && row_distance_to_goal(mv.to, team.opponent()) < row_distance_to_goal(mv.from, team.opponent())
        && mv.to.distance(&state.ball.position) <= mv.from.distance(&state.ball.position)
}

fn player_role(state: &GameState, pos: Position) -> Role {
    let p: &Player = state.player_at(&pos).expect("moving player must be on the board");
    role_for(state.level, p.team, p.player_id, p.is_goalkeeper)
}

/// Ranks moves by a fixed per-player role (assigned from starting position)
/// crossed with the current attack/defend/transition phase.
pub struct RoleBasedHeuristicAgent {
    name: String,
    rng: StdRng,
}

impl RoleBasedHeuristicAgent {
    pub fn new(name: impl Into<String>) -> RoleBasedHeuristicAgent {
        RoleBasedHeuristicAgent { name: name.into(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> RoleBasedHeuristicAgent {
        RoleBasedHeuristicAgent { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }
}

impl Agent for RoleBasedHeuristicAgent {
    fn choose(&mut self, state: &GameState, _deadline: Instant) -> Result<Move> {
        let moves = legal_moves(state);
        if moves.is_empty() {
            return Err(MastergoalError::invalid_input("no legal moves available"));
        }
        let team = state.current_team;
        let phase = phase_for(state, team);
        pick_top(
            &moves,
            |m| role_priority(player_role(state, m.from), phase, m, team, state),
            &mut self.rng,
        )
        .ok_or_else(|| MastergoalError::invalid_input("no candidate moves"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_based_heuristic_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::Three);
        let mut agent = RoleBasedHeuristicAgent::with_seed("role_based", 5);
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }

    #[test]
    fn goalkeeper_role_is_assigned_from_starting_flag() {
        assert_eq!(role_for(Level::Three, Team::Left, 4, true), Role::Goalkeeper);
        assert_eq!(role_for(Level::Three, Team::Left, 0, false), Role::Forward);
    }
}
