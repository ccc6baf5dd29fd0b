use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{pick_top, row_distance_to_goal};
use crate::agent::Agent;
use crate::board::{Position, COLS, ROWS};
use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move, MoveKind};
use crate::state::{GameState, Team};

/// The board divided into a 3x3 zone grid (row bands x column bands),
/// classifying where a cell falls for territorial control counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zone {
    pub row_band: u8,
    pub col_band: u8,
}

fn zone_of(pos: Position) -> Zone {
    let row_band = (pos.row as u32 * 3 / ROWS as u32) as u8;
    let col_band = (pos.col as u32 * 3 / COLS as u32) as u8;
    Zone { row_band, col_band }
}

/// The phase this team is in, derived from which third of the board the
/// ball currently occupies relative to the team's attacking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Ball in the team's own defensive third: contest possession.
    Press,
    /// Ball in the middle third: hold shape and circulate.
    Control,
    /// Ball in the opponent's defensive third: push for goal.
    Strike,
}

fn phase_for(state: &GameState, team: Team) -> Phase {
    let band = zone_of(state.ball.position).row_band;
    let attacking_down = team.attacking_goal_row() > team.defending_goal_row();
    let own_third = if attacking_down { 0 } else { 2 };
    let opponent_third = if attacking_down { 2 } else { 0 };
    if band == own_third {
        Phase::Press
    } else if band == opponent_third {
        Phase::Strike
    } else {
        Phase::Control
    }
}

/// Scores moves by territorial control: the number of zones a team holds a
/// numeric edge in, weighted by the current phase's priorities.
pub struct TerritorialHeuristicAgent {
    name: String,
    rng: StdRng,
}

impl TerritorialHeuristicAgent {
    pub fn new(name: impl Into<String>) -> TerritorialHeuristicAgent {
        TerritorialHeuristicAgent { name: name.into(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> TerritorialHeuristicAgent {
        TerritorialHeuristicAgent { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }

    fn zone_control_delta(&self, state: &GameState, team: Team, mv: Move) -> i64 {
        let mut counts = std::collections::HashMap::new();
        for p in &state.players {
            let entry = counts.entry(zone_of(p.position)).or_insert((0i64, 0i64));
            if p.team == team {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
        let from_zone = zone_of(mv.from);
        if let Some(entry) = counts.get_mut(&from_zone) {
            entry.0 -= 1;
        }
        let to_zone = zone_of(mv.to);
        let entry = counts.entry(to_zone).or_insert((0, 0));
        entry.0 += 1;

        counts.values().filter(|(own, opp)| own > opp).count() as i64
    }

    fn score(&self, state: &GameState, mv: Move, team: Team) -> i64 {
        let phase = phase_for(state, team);
        let control = self.zone_control_delta(state, team, mv) * 10;
        let phase_term = match (phase, mv.kind) {
            (Phase::Press, MoveKind::Move) if mv.to.distance(&state.ball.position) < mv.from.distance(&state.ball.position) => 5,
            (Phase::Control, MoveKind::Kick) => 3,
            (Phase::Strike, MoveKind::Kick) => -row_distance_to_goal(mv.to, team),
            _ => 0,
        };
        control + phase_term
    }
}

impl Agent for TerritorialHeuristicAgent {
    fn choose(&mut self, state: &GameState, _deadline: Instant) -> Result<Move> {
        let moves = legal_moves(state);
        if moves.is_empty() {
            return Err(MastergoalError::invalid_input("no legal moves available"));
        }
        let team = state.current_team;
        pick_top(&moves, |m| self.score(state, m, team), &mut self.rng)
            .ok_or_else(|| MastergoalError::invalid_input("no candidate moves"))
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
    fn territorial_heuristic_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::Two);
        let mut agent = TerritorialHeuristicAgent::with_seed("territorial", 11);
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }

    #[test]
    fn zone_of_partitions_board_into_nine_cells() {
        let z = zone_of(Position::new_unchecked(0, 0));
        assert_eq!(z, Zone { row_band: 0, col_band: 0 });
        let z = zone_of(Position::new_unchecked(14, 10));
        assert_eq!(z, Zone { row_band: 2, col_band: 2 });
    }
}
