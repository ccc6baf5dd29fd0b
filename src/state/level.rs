use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::state::{Ball, Player, Team};

/// The three rule levels, of increasing complexity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Level {
    pub fn from_u8(value: u8) -> crate::error::Result<Level> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(crate::error::MastergoalError::invalid_input(format!(
                "invalid level {other}, expected 1, 2 or 3"
            ))),
        }
    }

    pub fn rules(&self) -> &'static LevelRules {
        match self {
            Level::One => &LEVEL_ONE_RULES,
            Level::Two => &LEVEL_TWO_RULES,
            Level::Three => &LEVEL_THREE_RULES,
        }
    }
}

/// An axis-aligned, inclusive rectangle of board cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub row_lo: u8,
    pub row_hi: u8,
    pub col_lo: u8,
    pub col_hi: u8,
}

impl Rect {
    pub fn contains(&self, pos: &Position) -> bool {
        (self.row_lo..=self.row_hi).contains(&pos.row) && (self.col_lo..=self.col_hi).contains(&pos.col)
    }
}

/// Per-level constants resolved once at state construction. Component B's
/// "level rules" knobs: roster size, penalty areas, pass cap, and the
/// Level-3 special-tile set (an Open Question in the spec, resolved here as
/// a configurable table loaded alongside the level definition).
pub struct LevelRules {
    pub level: Level,
    /// Field players per team, excluding the goalkeeper.
    pub field_players_per_team: u8,
    pub has_goalkeeper: bool,
    /// Maximum consecutive passes a side may play before the cap prunes
    /// further kicks from the legal set.
    pub pass_cap: u8,
    /// Goalkeeper confinement area, keyed by the team that owns the keeper.
    pub penalty_area: fn(Team) -> Rect,
    /// The scoring cells inside each team's own goal mouth -- i.e. the
    /// cells the *opponent* must land a kick on to score.
    pub goal_mouth: fn(Team) -> Vec<Position>,
    /// Level-3 special tiles: landing a kick there grants the named team an
    /// extra turn. Empty for levels 1-2.
    pub special_tiles: HashMap<Position, Team>,
}

impl LevelRules {
    pub fn roster_size(&self) -> u8 {
        self.field_players_per_team + if self.has_goalkeeper { 1 } else { 0 }
    }
}

fn penalty_area_for(team: Team) -> Rect {
    match team {
        Team::Left => Rect { row_lo: 0, row_hi: 2, col_lo: 3, col_hi: 7 },
        Team::Right => Rect { row_lo: 12, row_hi: 14, col_lo: 3, col_hi: 7 },
    }
}

fn goal_mouth_for(team: Team) -> Vec<Position> {
    let row = match team {
        Team::Left => 0,
        Team::Right => 14,
    };
    (4..=6).map(|col| Position::new_unchecked(row, col)).collect()
}

static LEVEL_ONE_RULES: Lazy<LevelRules> = Lazy::new(|| LevelRules {
    level: Level::One,
    field_players_per_team: 1,
    has_goalkeeper: false,
    pass_cap: 1,
    penalty_area: penalty_area_for,
    goal_mouth: goal_mouth_for,
    special_tiles: HashMap::new(),
});

static LEVEL_TWO_RULES: Lazy<LevelRules> = Lazy::new(|| LevelRules {
    level: Level::Two,
    field_players_per_team: 2,
    has_goalkeeper: false,
    pass_cap: 2,
    penalty_area: penalty_area_for,
    goal_mouth: goal_mouth_for,
    special_tiles: HashMap::new(),
});

static LEVEL_THREE_RULES: Lazy<LevelRules> = Lazy::new(|| LevelRules {
    level: Level::Three,
    field_players_per_team: 4,
    has_goalkeeper: true,
    pass_cap: 3,
    penalty_area: penalty_area_for,
    goal_mouth: goal_mouth_for,
    special_tiles: {
        let mut tiles = HashMap::new();
        tiles.insert(Position::new_unchecked(8, 3), Team::Left);
        tiles.insert(Position::new_unchecked(8, 7), Team::Left);
        tiles.insert(Position::new_unchecked(6, 3), Team::Right);
        tiles.insert(Position::new_unchecked(6, 7), Team::Right);
        tiles
    },
});

/// The canonical board center, where the ball starts every game and after
/// every goal.
pub const CENTER: Position = Position::new_unchecked(7, 5);

/// Builds the canonical opening roster for a level: players at their fixed
/// starting cells, ball neutral at the board center.
pub fn opening_layout(level: Level) -> (Vec<Player>, Ball) {
    let ball = Ball::new(CENTER);
    let players = match level {
        Level::One => vec![
            Player::new(Team::Left, 0, Position::new_unchecked(4, 5), false),
            Player::new(Team::Right, 0, Position::new_unchecked(10, 5), false),
        ],
        Level::Two => vec![
            Player::new(Team::Left, 0, Position::new_unchecked(4, 5), false),
            Player::new(Team::Left, 1, Position::new_unchecked(2, 5), false),
            Player::new(Team::Right, 0, Position::new_unchecked(10, 5), false),
            Player::new(Team::Right, 1, Position::new_unchecked(12, 5), false),
        ],
        Level::Three => vec![
            Player::new(Team::Left, 0, Position::new_unchecked(4, 3), false),
            Player::new(Team::Left, 1, Position::new_unchecked(4, 7), false),
            Player::new(Team::Left, 2, Position::new_unchecked(2, 3), false),
            Player::new(Team::Left, 3, Position::new_unchecked(2, 7), false),
            Player::new(Team::Left, 4, Position::new_unchecked(1, 5), true),
            Player::new(Team::Right, 0, Position::new_unchecked(10, 3), false),
            Player::new(Team::Right, 1, Position::new_unchecked(10, 7), false),
            Player::new(Team::Right, 2, Position::new_unchecked(12, 3), false),
            Player::new(Team::Right, 3, Position::new_unchecked(12, 7), false),
            Player::new(Team::Right, 4, Position::new_unchecked(13, 5), true),
        ],
    };
    (players, ball)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_sizes_match_level() {
        for level in [Level::One, Level::Two, Level::Three] {
            let (players, _) = opening_layout(level);
            let rules = level.rules();
            assert_eq!(players.len() as u8, rules.roster_size() * 2);
        }
    }

    #[test]
    fn goalkeepers_start_inside_their_penalty_area() {
        let (players, _) = opening_layout(Level::Three);
        let rules = Level::Three.rules();
        for player in players.iter().filter(|p| p.is_goalkeeper) {
            let area = (rules.penalty_area)(player.team);
            assert!(area.contains(&player.position));
        }
    }
}
