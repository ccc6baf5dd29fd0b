use serde::{Deserialize, Serialize};

use crate::board::Position;

/// The single ball on the board. A ball is *neutral* when no player shares
/// its cell; carrier status is derived from [`GameState::ball_carrier`]
/// rather than stored here, so the "at most one carrier" invariant holds
/// structurally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Position,
}

impl Ball {
    pub fn new(position: Position) -> Ball {
        Ball { position }
    }
}
