//! Move executor. Component D. The only mutator of [`GameState`].

use crate::movegen::{legal_moves, Move, MoveKind};
use crate::state::{GameState, Team};

/// Applies `mv` to `state` in place.
///
/// Precondition: `mv` is a member of `legal_moves(state)`; violating it is
/// reported as [`crate::error::MastergoalError::IllegalMove`] and leaves
/// `state` unchanged. After every successful execution the resulting state
/// is checked against the invariants in the spec; a breach is a fatal
/// programming error, never a user-facing one.
///
/// Whether a kick is a pass or a capture, the turn always flips to the
/// other side afterwards unless a Level-3 special tile grants an extra
/// turn, or `state.skip_next_turn` was set by an earlier rule -- a pass
/// does not grant an extra turn of its own; it merely counts toward the
/// bounded run of consecutive passes.
pub fn execute(state: &mut GameState, mv: Move) -> crate::error::Result<()> {
    if !legal_moves(state).contains(&mv) {
        return Err(crate::error::MastergoalError::IllegalMove { mv });
    }

    match mv.kind {
        MoveKind::Move => execute_move(state, mv),
        MoveKind::Kick => execute_kick(state, mv),
    }

    state.check_invariants()?;
    Ok(())
}

fn advance_turn(state: &mut GameState, extra_turn: bool) {
    if state.skip_next_turn {
        state.skip_next_turn = false;
    } else if !extra_turn {
        state.current_team = state.current_team.opponent();
    }
    state.turn_count += 1;
}

fn execute_move(state: &mut GameState, mv: Move) {
    let team = state.current_team;
    let player = state
        .players
        .iter_mut()
        .find(|p| p.team == team && p.position == mv.from)
        .expect("legal_moves only returns moves for the side's own players");
    player.position = mv.to;

    state.passes_count = 0;
    advance_turn(state, false);
}

fn execute_kick(state: &mut GameState, mv: Move) {
    let kicking_team = state.current_team;
    let rules = state.rules();
    let extra_turn = rules.special_tiles.get(&mv.to) == Some(&kicking_team);

    state.ball.position = mv.to;

    let occupant = state.player_at(&mv.to).copied();
    match occupant {
        Some(other) if other.team == kicking_team => {
            // pass: possession retained, counts toward the cap.
            state.passes_count += 1;
        }
        Some(_opponent) => {
            // captured by the opponent.
            state.passes_count = 0;
        }
        None => {
            let goal_mouth = (rules.goal_mouth)(kicking_team.opponent());
            if goal_mouth.contains(&mv.to) {
                state.reset_after_goal(kicking_team);
                return; // the reset already set current_team and turn bookkeeping
            }
            state.last_possession_team = kicking_team;
            state.passes_count = 0;
        }
    }

    advance_turn(state, extra_turn);
}

/// Applies `mv` to a clone of `state`, leaving `state` untouched. The
/// convenience search code reaches for when it needs the resulting state
/// rather than an in-place mutation.
pub fn apply(state: &GameState, mv: Move) -> crate::error::Result<GameState> {
    let mut next = state.clone();
    execute(&mut next, mv)?;
    Ok(next)
}

/// `Option<Team>` is avoided here -- `None` above already distinguishes the
/// "neither side" case, so this alias exists only for readability at call
/// sites that reason about who last touched the ball.
pub type Possession = Option<Team>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::state::Level;

    #[test]
    fn goal_resets_board_and_scores() {
        let mut state = GameState::new_game(Level::One);
        state.players[0].position = Position::new(13, 5).unwrap();
        state.ball.position = Position::new(13, 5).unwrap();
        let mv = Move::kick(Position::new(13, 5).unwrap(), Position::new(14, 5).unwrap());
        execute(&mut state, mv).unwrap();

        assert_eq!(state.left_goals, 1);
        assert_eq!(state.right_goals, 0);
        assert_eq!(state.current_team, Team::Right);
        assert_eq!(state.ball.position, crate::state::CENTER);
    }

    #[test]
    fn illegal_move_is_rejected_and_state_unchanged() {
        let state = GameState::new_game(Level::One);
        let mut clone = state.clone();
        let bogus = Move::mv(Position::new(0, 0).unwrap(), Position::new(0, 1).unwrap());
        let result = execute(&mut clone, bogus);
        assert!(result.is_err());
        assert_eq!(clone.players, state.players);
    }

    #[test]
    fn pass_increments_count_and_flips_turn() {
        let mut state = GameState::new_game(Level::Two);
        state.players[0].position = Position::new(7, 5).unwrap(); // Left p0: kicker
        state.players[1].position = Position::new(7, 6).unwrap(); // Left p1: receiver
        state.ball.position = Position::new(7, 5).unwrap();
        let mv = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 6).unwrap());
        execute(&mut state, mv).unwrap();
        assert_eq!(state.passes_count, 1);
        assert_eq!(state.current_team, Team::Right);
    }

    #[test]
    fn special_tile_grants_extra_turn() {
        // (9,3) -> (8,3) lands on a level-3 special tile owned by LEFT.
        let mut state = GameState::new_game(Level::Three);
        state.players[0].position = Position::new(9, 3).unwrap();
        state.ball.position = Position::new(9, 3).unwrap();
        let to_special = Move::kick(Position::new(9, 3).unwrap(), Position::new(8, 3).unwrap());
        let before_team = state.current_team;
        execute(&mut state, to_special).unwrap();
        assert_eq!(state.current_team, before_team);
    }
}
