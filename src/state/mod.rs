//! Game state: players, ball, score, turn counter, level rules. Component B.

mod ball;
mod level;
mod player;

pub use ball::Ball;
pub use level::{opening_layout, Level, LevelRules, Rect, CENTER};
pub use player::Player;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::{MastergoalError, Result};

/// One of the two sides. LEFT defends row 0 and attacks toward row 14;
/// RIGHT is symmetric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Left,
    Right,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Left => Team::Right,
            Team::Right => Team::Left,
        }
    }

    /// +1 for LEFT, -1 for RIGHT; used to fold evaluation/reward signs
    /// branchlessly the way a negamax-style search wants.
    pub fn perspective(&self) -> i32 {
        match self {
            Team::Left => 1,
            Team::Right => -1,
        }
    }

    /// The row of the goal this team attacks (the opponent's own goal row).
    pub fn attacking_goal_row(&self) -> u8 {
        match self {
            Team::Left => 14,
            Team::Right => 0,
        }
    }

    /// The row of the goal this team defends (its own goal row).
    pub fn defending_goal_row(&self) -> u8 {
        self.opponent().attacking_goal_row()
    }
}

/// Outcome of a terminal position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Team(Team),
    Draw,
}

/// The full mutable game state. Mutated only by the executor (component D);
/// the generator and all agents treat it as read-only and clone to explore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level: Level,
    pub left_goals: u32,
    pub right_goals: u32,
    pub current_team: Team,
    pub last_possession_team: Team,
    pub passes_count: u8,
    pub turn_count: u32,
    pub skip_next_turn: bool,
    pub players: Vec<Player>,
    pub ball: Ball,
}

impl GameState {
    /// Creates a state at the canonical opening layout for `level`, ball at
    /// the board center, LEFT to move.
    pub fn new_game(level: Level) -> GameState {
        let (players, ball) = opening_layout(level);
        GameState {
            level,
            left_goals: 0,
            right_goals: 0,
            current_team: Team::Left,
            last_possession_team: Team::Left,
            passes_count: 0,
            turn_count: 0,
            skip_next_turn: false,
            players,
            ball,
        }
    }

    pub fn rules(&self) -> &'static LevelRules {
        self.level.rules()
    }

    /// The player sharing the ball's cell, if any. The ball is neutral when
    /// this returns `None`.
    pub fn ball_carrier(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.position == self.ball.position)
    }

    pub fn ball_carrier_mut(&mut self) -> Option<&mut Player> {
        let ball_pos = self.ball.position;
        self.players.iter_mut().find(|p| p.position == ball_pos)
    }

    pub fn is_ball_neutral(&self) -> bool {
        self.ball_carrier().is_none()
    }

    pub fn player_at(&self, pos: &Position) -> Option<&Player> {
        self.players.iter().find(|p| &p.position == pos)
    }

    pub fn players_of(&self, team: Team) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.team == team)
    }

    pub fn goals_for(&self, team: Team) -> u32 {
        match team {
            Team::Left => self.left_goals,
            Team::Right => self.right_goals,
        }
    }

    fn add_goal(&mut self, team: Team) {
        match team {
            Team::Left => self.left_goals += 1,
            Team::Right => self.right_goals += 1,
        }
    }

    /// Resets the board to the canonical opening with `conceding_team` to
    /// move, preserving the score and turn counter.
    pub(crate) fn reset_after_goal(&mut self, scoring_team: Team) {
        self.add_goal(scoring_team);
        let (players, ball) = opening_layout(self.level);
        self.players = players;
        self.ball = ball;
        self.current_team = scoring_team.opponent();
        self.passes_count = 0;
        self.last_possession_team = self.current_team;
        self.skip_next_turn = false;
    }

    /// Determines whether the game has ended, and who won.
    ///
    /// `win_goals` and `max_turns` are supplied by the caller (the outer
    /// wrapper); when `max_turns` is `None`, an internal 200-turn cap
    /// still applies. The external override takes precedence over the
    /// internal cap when both would fire on the same turn.
    pub fn is_game_over(&self, win_goals: u32, max_turns: Option<u32>) -> Option<Winner> {
        if self.left_goals >= win_goals {
            return Some(Winner::Team(Team::Left));
        }
        if self.right_goals >= win_goals {
            return Some(Winner::Team(Team::Right));
        }
        const INTERNAL_TURN_CAP: u32 = 200;
        let cap = max_turns.unwrap_or(INTERNAL_TURN_CAP);
        if self.turn_count >= cap {
            return Some(Winner::Draw);
        }
        None
    }

    /// Validates the invariants listed in the spec. A violation is a fatal
    /// programming error (kind 5), never a user-facing one.
    pub fn check_invariants(&self) -> Result<()> {
        let rules = self.rules();

        for player in &self.players {
            if !player.position.in_bounds() {
                return Err(MastergoalError::invariant(format!(
                    "player {:?} of team {:?} is out of bounds at {:?}",
                    player.player_id, player.team, player.position
                )));
            }
        }

        for (i, a) in self.players.iter().enumerate() {
            for b in self.players.iter().skip(i + 1) {
                if a.position == b.position {
                    return Err(MastergoalError::invariant(format!(
                        "players {:?} and {:?} share cell {:?}",
                        a.player_id, b.player_id, a.position
                    )));
                }
            }
        }

        for team in [Team::Left, Team::Right] {
            let count = self.players_of(team).count() as u8;
            if count != rules.roster_size() {
                return Err(MastergoalError::invariant(format!(
                    "team {:?} has {} players, expected {}",
                    team, count, rules.roster_size()
                )));
            }
        }

        if !self.ball.position.in_bounds() {
            return Err(MastergoalError::invariant(format!(
                "ball at out-of-bounds cell {:?}",
                self.ball.position
            )));
        }

        for player in self.players.iter().filter(|p| p.is_goalkeeper) {
            let area = (rules.penalty_area)(player.team);
            if !area.contains(&player.position) {
                return Err(MastergoalError::invariant(format!(
                    "goalkeeper of team {:?} at {:?} is outside its penalty area",
                    player.team, player.position
                )));
            }
        }

        if self.passes_count > rules.pass_cap {
            return Err(MastergoalError::invariant(format!(
                "passes_count {} exceeds cap {}",
                self.passes_count, rules.pass_cap
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_satisfies_invariants() {
        for level in [Level::One, Level::Two, Level::Three] {
            let state = GameState::new_game(level);
            state.check_invariants().unwrap();
        }
    }

    #[test]
    fn ball_starts_neutral_at_center() {
        let state = GameState::new_game(Level::One);
        assert!(state.is_ball_neutral());
        assert_eq!(state.ball.position, CENTER);
    }

    #[test]
    fn goal_resets_to_canonical_opening() {
        let mut state = GameState::new_game(Level::One);
        state.reset_after_goal(Team::Left);
        assert_eq!(state.left_goals, 1);
        assert_eq!(state.current_team, Team::Right);
        assert_eq!(state.passes_count, 0);
        assert_eq!(state.ball.position, CENTER);
    }
}
