//! Legal-move generator. Component C.
//!
//! Produces the ordered sequence of `(kind, from, to)` triples legal for the
//! side to move. Ties are resolved by `(row, col)` of `from` then `to`; this
//! ordering is observable and covered by tests.

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Move,
    Kick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn mv(from: Position, to: Position) -> Move {
        Move { kind: MoveKind::Move, from, to }
    }

    pub fn kick(from: Position, to: Position) -> Move {
        Move { kind: MoveKind::Kick, from, to }
    }

    fn order_key(&self) -> (u8, u8, u8, u8) {
        (self.from.row, self.from.col, self.to.row, self.to.col)
    }
}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

const DIRECTIONS: [(i16, i16); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// Returns the ordered set of legal moves for `state.current_team`.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_player_moves(state, &mut moves);
    generate_kicks(state, &mut moves);
    moves.sort_unstable();
    moves
}

fn generate_player_moves(state: &GameState, moves: &mut Vec<Move>) {
    let rules = state.rules();
    for player in state.players_of(state.current_team) {
        let max_dist: u8 = if player.is_goalkeeper { 1 } else { 2 };
        let penalty_area = player.is_goalkeeper.then(|| (rules.penalty_area)(player.team));

        for dr in -(max_dist as i16)..=(max_dist as i16) {
            for dc in -(max_dist as i16)..=(max_dist as i16) {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let row = player.position.row as i16 + dr;
                let col = player.position.col as i16 + dc;
                if row < 0 || col < 0 {
                    continue;
                }
                let Ok(dest) = Position::new(row as u8, col as u8) else { continue };

                if let Some(area) = &penalty_area {
                    if !area.contains(&dest) {
                        continue;
                    }
                }

                if state.player_at(&dest).is_some() {
                    continue;
                }

                if dest == state.ball.position && !state.is_ball_neutral() {
                    continue;
                }

                let intermediate = player.position.ray_to(&dest);
                if intermediate.iter().any(|cell| state.player_at(cell).is_some()) {
                    continue;
                }

                moves.push(Move::mv(player.position, dest));
            }
        }
    }
}

fn generate_kicks(state: &GameState, moves: &mut Vec<Move>) {
    let Some(carrier) = state.ball_carrier() else { return };
    if carrier.team != state.current_team {
        return;
    }
    let rules = state.rules();
    let ball_pos = state.ball.position;

    for &(dr, dc) in DIRECTIONS.iter() {
        for dist in 1..=4i16 {
            let row = ball_pos.row as i16 + dr * dist;
            let col = ball_pos.col as i16 + dc * dist;
            if row < 0 || col < 0 {
                break;
            }
            let Ok(target) = Position::new(row as u8, col as u8) else { break };

            let intermediate = ball_pos.ray_to(&target);
            if intermediate.iter().any(|cell| state.player_at(cell).is_some()) {
                break; // this direction is blocked at or before `target`
            }

            if let Some(occupant) = state.player_at(&target) {
                if occupant.team == carrier.team {
                    // a pass; excluded once the cap would be exceeded
                    if state.passes_count < rules.pass_cap {
                        moves.push(Move::kick(ball_pos, target));
                    }
                } else {
                    moves.push(Move::kick(ball_pos, target));
                }
            } else {
                moves.push(Move::kick(ball_pos, target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Level;

    #[test]
    fn level_one_opener_is_legal_and_no_kicks_available() {
        let state = GameState::new_game(Level::One);
        let moves = legal_moves(&state);
        let opener = Move::mv(Position::new(4, 5).unwrap(), Position::new(6, 5).unwrap());
        assert!(moves.contains(&opener));
        assert!(moves.iter().all(|m| m.kind == MoveKind::Move));
    }

    #[test]
    fn kick_through_opponent_is_illegal() {
        let mut state = GameState::new_game(Level::One);
        state.ball.position = Position::new(7, 5).unwrap();
        state.players = vec![
            crate::state::Player::new(Team::Left, 0, Position::new(7, 5).unwrap(), false),
            crate::state::Player::new(Team::Right, 0, Position::new(7, 7).unwrap(), false),
        ];
        let moves = legal_moves(&state);
        let blocked = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 9).unwrap());
        let allowed = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 6).unwrap());
        assert!(!moves.contains(&blocked));
        assert!(moves.contains(&allowed));
    }

    #[test]
    fn kick_of_length_four_legal_five_illegal() {
        let mut state = GameState::new_game(Level::One);
        state.ball.position = Position::new(7, 1).unwrap();
        state.players = vec![
            crate::state::Player::new(Team::Left, 0, Position::new(7, 1).unwrap(), false),
            crate::state::Player::new(Team::Right, 0, Position::new(0, 0).unwrap(), false),
        ];
        let moves = legal_moves(&state);
        assert!(moves.contains(&Move::kick(Position::new(7, 1).unwrap(), Position::new(7, 5).unwrap())));
        assert!(!moves.iter().any(|m| m.kind == MoveKind::Kick && m.to == Position::new(7, 6).unwrap()));
    }

    #[test]
    fn pass_cap_excludes_passes_beyond_cap() {
        use crate::state::Team;
        let mut state = GameState::new_game(Level::One);
        state.passes_count = 1; // level 1 cap is 1
        state.ball.position = Position::new(7, 5).unwrap();
        state.players = vec![
            crate::state::Player::new(Team::Left, 0, Position::new(7, 5).unwrap(), false),
            crate::state::Player::new(Team::Left, 1, Position::new(7, 6).unwrap(), false),
            crate::state::Player::new(Team::Right, 0, Position::new(0, 0).unwrap(), false),
        ];
        let moves = legal_moves(&state);
        let pass_to_teammate = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 6).unwrap());
        assert!(!moves.contains(&pass_to_teammate));
        assert!(moves.iter().any(|m| m.kind == MoveKind::Kick));
    }
}
