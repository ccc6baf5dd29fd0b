use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::state::Team;

/// A single player on the board. Component B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub team: Team,
    pub player_id: u8,
    pub position: Position,
    pub is_goalkeeper: bool,
}

impl Player {
    pub fn new(team: Team, player_id: u8, position: Position, is_goalkeeper: bool) -> Player {
        Player { team, player_id, position, is_goalkeeper }
    }
}
