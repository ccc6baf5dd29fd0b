use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{pick_top, row_distance_to_goal};
use crate::agent::Agent;
use crate::board::Position;
use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move, MoveKind};
use crate::state::{GameState, Player, Team};

/// Preferred side length of the active triangle; the "fluid" style from the
/// original formation heuristic.
const IDEAL_TRIANGLE_DISTANCE: f64 = 4.0;
/// How far a triangle side may drift from the ideal before a support move
/// stops counting as "maintaining" the triangle.
const TRIANGLE_TOLERANCE: f64 = 1.2;
/// Degenerate triangles (near-collinear players) score zero on the angle
/// term once their smallest interior angle drops below this.
const MIN_ANGLE_DEGREES: f64 = 30.0;
/// Target distance a support player (outside the active triangle) keeps
/// from the ball.
const SUPPORT_DISTANCE: f64 = 5.0;

/// The three players of `team` closest to the ball, considered the "active
/// triangle" whose shape this heuristic tries to keep close to equilateral,
/// well-angled, and centered on the ball.
fn active_triangle(state: &GameState, team: Team) -> Vec<&Player> {
    let mut players: Vec<&Player> = state.players_of(team).collect();
    players.sort_by_key(|p| p.position.distance(&state.ball.position));
    players.truncate(3);
    players
}

fn centroid(positions: &[Position; 3]) -> (f64, f64) {
    let row = positions.iter().map(|p| p.row as f64).sum::<f64>() / 3.0;
    let col = positions.iter().map(|p| p.col as f64).sum::<f64>() / 3.0;
    (row, col)
}

/// The three interior angles (degrees) of the triangle with side lengths
/// `d12`, `d23`, `d31`, via the law of cosines. Falls back to an
/// equilateral triangle's angles if the sides can't form one (shouldn't
/// happen for non-degenerate positions, but guards the `acos` domain).
fn triangle_angles(d12: f64, d23: f64, d31: f64) -> [f64; 3] {
    let angle = |a: f64, b: f64, c: f64| {
        if a <= 0.0 || b <= 0.0 {
            return 60.0;
        }
        let cos_c = (a * a + b * b - c * c) / (2.0 * a * b);
        cos_c.clamp(-1.0, 1.0).acos().to_degrees()
    };
    [angle(d12, d31, d23), angle(d12, d23, d31), angle(d23, d31, d12)]
}

/// Quality of the three-player formation in `[0.0, 1.0]`, combining the
/// three criteria named for this heuristic: how close the side lengths sit
/// to [`IDEAL_TRIANGLE_DISTANCE`], how far the smallest interior angle sits
/// above [`MIN_ANGLE_DEGREES`], and how close the centroid sits to `ball`.
fn triangle_quality(positions: &[Position; 3], ball: Position) -> f64 {
    let d12 = positions[0].distance(&positions[1]) as f64;
    let d23 = positions[1].distance(&positions[2]) as f64;
    let d31 = positions[2].distance(&positions[0]) as f64;

    let avg_distance = (d12 + d23 + d31) / 3.0;
    let spacing_score = 1.0 - ((avg_distance - IDEAL_TRIANGLE_DISTANCE).abs() / IDEAL_TRIANGLE_DISTANCE).min(1.0);

    let angles = triangle_angles(d12, d23, d31);
    let min_angle = angles.iter().cloned().fold(f64::INFINITY, f64::min);
    let angle_score = if min_angle > 0.0 { (min_angle / MIN_ANGLE_DEGREES).min(1.0) } else { 0.0 };

    let (centroid_row, centroid_col) = centroid(positions);
    let ball_distance = ((centroid_row - ball.row as f64).powi(2) + (centroid_col - ball.col as f64).powi(2)).sqrt();
    let ball_proximity_score = 1.0 / (1.0 + ball_distance);

    spacing_score * 0.4 + angle_score * 0.4 + ball_proximity_score * 0.2
}

/// Scores candidate moves by how they shape the active triangle: a kick is
/// judged by the formation quality it leaves behind (so passes that keep
/// the triangle close to ideal spacing, well-angled, and centered on the
/// ball outscore ones that scatter it), weighted toward ones that also
/// advance a triangle member upfield; a MOVE by a triangle member is judged
/// by the quality delta it causes, and a MOVE by a support player by how
/// close it keeps that player to [`SUPPORT_DISTANCE`] from the ball.
pub struct TriangleHeuristicAgent {
    name: String,
    rng: StdRng,
}

impl TriangleHeuristicAgent {
    pub fn new(name: impl Into<String>) -> TriangleHeuristicAgent {
        TriangleHeuristicAgent { name: name.into(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> TriangleHeuristicAgent {
        TriangleHeuristicAgent { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }

    fn score(&self, state: &GameState, mv: Move, team: Team) -> i64 {
        let triangle = active_triangle(state, team);
        let Ok(before): std::result::Result<[Position; 3], _> =
            triangle.iter().map(|p| p.position).collect::<Vec<_>>().try_into()
        else {
            return 0;
        };

        if mv.kind == MoveKind::Kick {
            return self.score_kick(state, mv, team, &triangle, before);
        }
        self.score_move(state, mv, &triangle, before)
    }

    /// A kick is scored by the triangle quality it would leave behind (ball
    /// moved to `mv.to`, players unchanged), plus a bonus for landing next
    /// to a triangle member who is advancing upfield and for keeping the
    /// *other* two members within tolerance of the ideal distance from the
    /// new ball position -- preferring passes that both preserve the
    /// triangle and progress play, as in the original triangle-pass and
    /// `_maintains_triangle` checks.
    fn score_kick(&self, state: &GameState, mv: Move, team: Team, triangle: &[&Player], before: [Position; 3]) -> i64 {
        let quality = triangle_quality(&before, mv.to);

        let receiver = triangle.iter().find(|p| p.position.is_adjacent(&mv.to) || p.position == mv.to);
        let advancing_bonus = receiver
            .map(|p| row_distance_to_goal(state.ball.position, team) - row_distance_to_goal(p.position, team))
            .unwrap_or(0);

        let maintains_bonus = match receiver {
            Some(receiver) => {
                let others: Vec<f64> = triangle
                    .iter()
                    .filter(|p| p.position != receiver.position)
                    .map(|p| p.position.distance(&mv.to) as f64)
                    .collect();
                let avg = others.iter().sum::<f64>() / others.len().max(1) as f64;
                if (avg - IDEAL_TRIANGLE_DISTANCE).abs() <= TRIANGLE_TOLERANCE * 2.0 {
                    15
                } else {
                    0
                }
            }
            None => 0,
        };

        (quality * 100.0) as i64 + advancing_bonus as i64 * 5 + maintains_bonus
    }

    /// A MOVE by a triangle member is scored by the quality delta it
    /// causes (ball position held fixed); a MOVE by a support player (the
    /// two players outside the active triangle) is scored by how close it
    /// keeps that player to [`SUPPORT_DISTANCE`] from the ball.
    fn score_move(&self, state: &GameState, mv: Move, triangle: &[&Player], before: [Position; 3]) -> i64 {
        let ball = state.ball.position;
        let Some(slot) = triangle.iter().position(|p| p.position == mv.from) else {
            let before_gap = (mv.from.distance(&ball) as f64 - SUPPORT_DISTANCE).abs();
            let after_gap = (mv.to.distance(&ball) as f64 - SUPPORT_DISTANCE).abs();
            return ((before_gap - after_gap) * 20.0) as i64;
        };

        let quality_before = triangle_quality(&before, ball);
        let mut after = before;
        after[slot] = mv.to;
        let quality_after = triangle_quality(&after, ball);

        ((quality_after - quality_before) * 200.0) as i64
    }
}

impl Agent for TriangleHeuristicAgent {
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
    fn triangle_heuristic_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::Three);
        let mut agent = TriangleHeuristicAgent::with_seed("triangle", 9);
        let mv = agent.choose(&state, Instant::now()).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }

    #[test]
    fn active_triangle_picks_closest_three_to_ball() {
        let state = GameState::new_game(Level::Three);
        let triangle = active_triangle(&state, Team::Left);
        assert_eq!(triangle.len(), 3);
    }

    #[test]
    fn tighter_better_angled_formation_scores_higher() {
        let equilateral = [
            Position::new(4, 5).unwrap(),
            Position::new(8, 3).unwrap(),
            Position::new(8, 7).unwrap(),
        ];
        let collinear = [
            Position::new(4, 3).unwrap(),
            Position::new(4, 5).unwrap(),
            Position::new(4, 7).unwrap(),
        ];
        let ball = Position::new(7, 5).unwrap();
        assert!(triangle_quality(&equilateral, ball) > triangle_quality(&collinear, ball));
    }
}
