//! Heuristic agents. Component F.
//!
//! Five rule-ranked move choosers sharing the vocabulary of "rules" named
//! in the spec: goal kick, advancing kick, supporting pass, ball approach,
//! defensive positioning. Each agent scores or ranks candidate moves with
//! these rules and breaks ties at random.

pub mod advanced;
pub mod basic;
pub mod role_based;
pub mod territorial;
pub mod triangle;

pub use advanced::AdvancedHeuristicAgent;
pub use basic::BasicHeuristicAgent;
pub use role_based::RoleBasedHeuristicAgent;
pub use territorial::TerritorialHeuristicAgent;
pub use triangle::TriangleHeuristicAgent;

use crate::board::Position;
use crate::movegen::{Move, MoveKind};
use crate::state::{GameState, Player, Team};

/// Chebyshev distance from `pos` to `team`'s *attacking* goal row,
/// collapsed to a row-only measure since the rules only ever compare
/// "closer to the opponent's goal", not exact cell distance.
pub fn row_distance_to_goal(pos: Position, team: Team) -> i16 {
    (pos.row as i16 - team.attacking_goal_row() as i16).abs()
}

/// A kick whose landing cell scores.
pub fn is_goal_kick(state: &GameState, mv: Move, kicker_team: Team) -> bool {
    if mv.kind != MoveKind::Kick {
        return false;
    }
    if state.player_at(&mv.to).is_some() {
        return false;
    }
    let rules = state.rules();
    (rules.goal_mouth)(kicker_team.opponent()).contains(&mv.to)
}

/// A kick that decreases the Chebyshev distance from ball to opponent goal row.
pub fn is_advancing_kick(state: &GameState, mv: Move, kicker_team: Team) -> bool {
    if mv.kind != MoveKind::Kick {
        return false;
    }
    row_distance_to_goal(mv.to, kicker_team) < row_distance_to_goal(state.ball.position, kicker_team)
}

/// A kick landing adjacent to a teammate who is closer to the opponent's
/// goal than the current ball position.
pub fn is_supporting_pass(state: &GameState, mv: Move, kicker_team: Team) -> bool {
    if mv.kind != MoveKind::Kick {
        return false;
    }
    let ball_row_dist = row_distance_to_goal(state.ball.position, kicker_team);
    state.players_of(kicker_team).any(|p| {
        p.position != mv.from
            && p.position.is_adjacent(&mv.to)
            && row_distance_to_goal(p.position, kicker_team) < ball_row_dist
    })
}

/// A MOVE whose destination is strictly closer to the ball than its origin.
pub fn is_ball_approach(state: &GameState, mv: Move) -> bool {
    mv.kind == MoveKind::Move && mv.to.distance(&state.ball.position) < mv.from.distance(&state.ball.position)
}

/// A MOVE that places the player between the ball and its own goal row.
pub fn is_defensive_positioning(state: &GameState, mv: Move, team: Team) -> bool {
    if mv.kind != MoveKind::Move {
        return false;
    }
    let own_goal_row = team.defending_goal_row() as i16;
    let ball_row = state.ball.position.row as i16;
    let lo = own_goal_row.min(ball_row);
    let hi = own_goal_row.max(ball_row);
    let to_row = mv.to.row as i16;
    let from_row = mv.from.row as i16;
    (lo..=hi).contains(&to_row) && !(lo..=hi).contains(&from_row)
}

/// Picks uniformly among the highest-ranked candidates, breaking ties at
/// random the way every heuristic agent in the spec is required to.
pub fn pick_top<'a>(moves: &'a [Move], mut rank: impl FnMut(Move) -> i64, rng: &mut impl rand::Rng) -> Option<Move> {
    use rand::seq::SliceRandom;
    let best = moves.iter().map(|&m| rank(m)).max()?;
    let top: Vec<Move> = moves.iter().copied().filter(|&m| rank(m) == best).collect();
    top.choose(rng).copied()
}

/// Euclidean-flavoured helper used by the scoring heuristics: column
/// centrality, higher near the board's center column.
pub fn column_centrality(pos: Position) -> i64 {
    let center_col = (crate::board::COLS as i16 - 1) / 2;
    -(pos.col as i16 - center_col).abs() as i64
}

pub fn nearest_teammate_distance(state: &GameState, team: Team, pos: Position, exclude: Position) -> Option<u8> {
    state
        .players_of(team)
        .filter(|p| p.position != exclude)
        .map(|p| p.position.distance(&pos))
        .min()
}

pub fn count_within<'a>(players: impl Iterator<Item = &'a Player>, pos: Position, radius: u8) -> usize {
    players.filter(|p| p.position.distance(&pos) <= radius).count()
}
