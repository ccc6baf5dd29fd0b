//! Root-level move selection once search has exhausted its iteration
//! budget. Grounded on `strategies/final_move.py`.

use crate::movegen::{Move, MoveKind};
use crate::state::GameState;

use super::node::MctsTree;

pub trait FinalMoveStrategy {
    fn select_move(&self, tree: &MctsTree, root: usize) -> Option<Move>;
}

/// Highest average reward (pure exploitation).
pub struct MaxChildStrategy;

impl FinalMoveStrategy for MaxChildStrategy {
    fn select_move(&self, tree: &MctsTree, root: usize) -> Option<Move> {
        tree.nodes[root]
            .children
            .iter()
            .copied()
            .max_by(|&a, &b| avg_reward(tree, a).partial_cmp(&avg_reward(tree, b)).unwrap_or(std::cmp::Ordering::Equal))
            .and_then(|idx| tree.nodes[idx].mv)
    }
}

fn avg_reward(tree: &MctsTree, idx: usize) -> f64 {
    let n = &tree.nodes[idx];
    if n.visits > 0 {
        n.total_reward / n.visits as f64
    } else {
        f64::NEG_INFINITY
    }
}

/// Most-visited child (most explored, the default robust choice).
pub struct RobustChildStrategy;

impl FinalMoveStrategy for RobustChildStrategy {
    fn select_move(&self, tree: &MctsTree, root: usize) -> Option<Move> {
        tree.nodes[root]
            .children
            .iter()
            .copied()
            .max_by_key(|&idx| tree.nodes[idx].visits)
            .and_then(|idx| tree.nodes[idx].mv)
    }
}

/// Among the children in the top `top_percentage` of average reward, picks
/// the most-visited one.
pub struct RobustMaxChildStrategy {
    pub top_percentage: f64,
}

impl RobustMaxChildStrategy {
    pub fn new(top_percentage: f64) -> RobustMaxChildStrategy {
        RobustMaxChildStrategy { top_percentage }
    }
}

impl FinalMoveStrategy for RobustMaxChildStrategy {
    fn select_move(&self, tree: &MctsTree, root: usize) -> Option<Move> {
        let mut ranked: Vec<(usize, f64)> = tree.nodes[root]
            .children
            .iter()
            .copied()
            .filter(|&idx| tree.nodes[idx].visits > 0)
            .map(|idx| (idx, avg_reward(tree, idx)))
            .collect();
        if ranked.is_empty() {
            return None;
        }
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let top_count = ((ranked.len() as f64 * self.top_percentage).floor() as usize).max(1);
        ranked
            .into_iter()
            .take(top_count)
            .max_by_key(|&(idx, _)| tree.nodes[idx].visits)
            .and_then(|(idx, _)| tree.nodes[idx].mv)
    }
}

/// Checks for an immediate goal-scoring kick among the root's children
/// before falling back to another strategy.
pub struct DecisiveMoveStrategy {
    pub fallback: Box<dyn FinalMoveStrategy + Send>,
    pub enabled: bool,
}

impl DecisiveMoveStrategy {
    pub fn new(fallback: Box<dyn FinalMoveStrategy + Send>) -> DecisiveMoveStrategy {
        DecisiveMoveStrategy { fallback, enabled: true }
    }

    fn is_goal_opportunity(&self, state: &GameState, mv: Move) -> bool {
        if mv.kind != MoveKind::Kick {
            return false;
        }
        let rules = state.rules();
        (rules.goal_mouth)(state.current_team.opponent()).contains(&mv.to)
    }
}

impl FinalMoveStrategy for DecisiveMoveStrategy {
    fn select_move(&self, tree: &MctsTree, root: usize) -> Option<Move> {
        if self.enabled {
            let root_state = &tree.nodes[root].state;
            for &child in &tree.nodes[root].children {
                if let Some(mv) = tree.nodes[child].mv {
                    if self.is_goal_opportunity(root_state, mv) {
                        return Some(mv);
                    }
                }
            }
        }
        self.fallback.select_move(tree, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GameState, Level};

    #[test]
    fn robust_child_picks_most_visited() {
        let mut tree = MctsTree::new(GameState::new_game(Level::One));
        let moves = crate::movegen::legal_moves(&tree.nodes[MctsTree::ROOT].state);
        let a = tree.add_child(MctsTree::ROOT, moves[0]).unwrap();
        let b = tree.add_child(MctsTree::ROOT, moves[1]).unwrap();
        tree.nodes[a].visits = 3;
        tree.nodes[a].total_reward = 1.0;
        tree.nodes[b].visits = 10;
        tree.nodes[b].total_reward = 0.5;
        let picked = RobustChildStrategy.select_move(&tree, MctsTree::ROOT).unwrap();
        assert_eq!(picked, tree.nodes[b].mv.unwrap());
    }

    #[test]
    fn max_child_picks_highest_average_reward() {
        let mut tree = MctsTree::new(GameState::new_game(Level::One));
        let moves = crate::movegen::legal_moves(&tree.nodes[MctsTree::ROOT].state);
        let a = tree.add_child(MctsTree::ROOT, moves[0]).unwrap();
        let b = tree.add_child(MctsTree::ROOT, moves[1]).unwrap();
        tree.nodes[a].visits = 10;
        tree.nodes[a].total_reward = 2.0;
        tree.nodes[b].visits = 3;
        tree.nodes[b].total_reward = 2.5;
        let picked = MaxChildStrategy.select_move(&tree, MctsTree::ROOT).unwrap();
        assert_eq!(picked, tree.nodes[b].mv.unwrap());
    }
}
