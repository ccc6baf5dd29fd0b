//! Board primitives: position, adjacency, distance. Component A.
//!
//! Immutable value types with no failure modes of their own; callers that
//! need to validate caller-supplied coordinates use [`Position::new`].

use serde::{Deserialize, Serialize};

use crate::error::{PositionError, Result};

/// Rows on the Mastergoal board.
pub const ROWS: u8 = 15;
/// Columns on the Mastergoal board.
pub const COLS: u8 = 11;

/// A board cell; `0 <= row < ROWS`, `0 <= col < COLS` is enforced at
/// construction via [`Position::new`], never by later mutation (the type
/// has no setters).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Constructs a position, rejecting out-of-bounds coordinates.
    pub fn new(row: u8, col: u8) -> Result<Position> {
        if row >= ROWS || col >= COLS {
            return Err(PositionError::at(row as i16, col as i16).into());
        }
        Ok(Position { row, col })
    }

    /// Constructs a position without bounds checking; used internally where
    /// the caller has already established the coordinate is on the board
    /// (e.g. canonical opening layouts, iteration over the grid).
    pub(crate) const fn new_unchecked(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Chebyshev distance between two positions.
    pub fn distance(&self, other: &Position) -> u8 {
        let dr = (self.row as i16 - other.row as i16).unsigned_abs() as u8;
        let dc = (self.col as i16 - other.col as i16).unsigned_abs() as u8;
        dr.max(dc)
    }

    /// Two positions are adjacent iff their Chebyshev distance is exactly 1.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self != other && self.distance(other) <= 1
    }

    /// The (up to) 8 neighbouring cells, clipped to the board.
    pub fn adjacent_cells(&self) -> impl Iterator<Item = Position> + '_ {
        const OFFSETS: [(i16, i16); 8] = [
            (-1, -1), (-1, 0), (-1, 1),
            (0, -1), (0, 1),
            (1, -1), (1, 0), (1, 1),
        ];
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = self.row as i16 + dr;
            let col = self.col as i16 + dc;
            if row >= 0 && col >= 0 && row < ROWS as i16 && col < COLS as i16 {
                Some(Position::new_unchecked(row as u8, col as u8))
            } else {
                None
            }
        })
    }

    /// Every cell strictly between `self` and `other` along the Chebyshev
    /// ray connecting them, in order, excluding both endpoints. Returns an
    /// empty vector if the two points are not aligned on a Chebyshev ray
    /// (horizontal, vertical, or diagonal).
    pub fn ray_to(&self, other: &Position) -> Vec<Position> {
        let dr = other.row as i16 - self.row as i16;
        let dc = other.col as i16 - self.col as i16;
        let steps = dr.abs().max(dc.abs());
        if steps == 0 {
            return Vec::new();
        }
        if dr.abs() != 0 && dc.abs() != 0 && dr.abs() != dc.abs() {
            return Vec::new();
        }
        let (step_r, step_c) = (dr.signum(), dc.signum());
        (1..steps)
            .map(|i| {
                Position::new_unchecked(
                    (self.row as i16 + step_r * i) as u8,
                    (self.col as i16 + step_c * i) as u8,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_cells_clips_at_board_edges() {
        let corner = Position::new(0, 0).unwrap();
        let neighbours: Vec<_> = corner.adjacent_cells().collect();
        assert_eq!(neighbours.len(), 3);
    }

    #[test]
    fn distance_is_chebyshev() {
        let a = Position::new(3, 3).unwrap();
        let b = Position::new(5, 4).unwrap();
        assert_eq!(a.distance(&b), 2);
    }

    #[test]
    fn ray_to_excludes_endpoints() {
        let a = Position::new(7, 5).unwrap();
        let b = Position::new(7, 9).unwrap();
        let ray = a.ray_to(&b);
        assert_eq!(ray, vec![
            Position::new(7, 6).unwrap(),
            Position::new(7, 7).unwrap(),
            Position::new(7, 8).unwrap(),
        ]);
    }

    #[test]
    fn ray_to_non_aligned_is_empty() {
        let a = Position::new(0, 0).unwrap();
        let b = Position::new(3, 5).unwrap();
        assert!(a.ray_to(&b).is_empty());
    }

    #[test]
    fn out_of_bounds_position_is_rejected() {
        assert!(Position::new(ROWS, 0).is_err());
        assert!(Position::new(0, COLS).is_err());
    }
}
