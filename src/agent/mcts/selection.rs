//! Child-selection strategies, walked once a node is fully expanded.
//! Grounded on `strategies/selection.py`'s UCT / Progressive Bias /
//! Progressive History hierarchy; each worker thread owns its own instance,
//! so a Progressive History table is never shared across threads.

use std::collections::HashMap;

use crate::movegen::Move;
use crate::state::Team;

use super::node::MctsTree;

pub trait SelectionStrategy {
    /// Picks one of `node`'s children to descend into.
    fn select(&self, tree: &MctsTree, node: usize) -> usize;

    /// Called once per simulation, on the expanded leaf only, to let
    /// history-keeping strategies record the outcome.
    fn update_history(&mut self, _team: Team, _mv: Move, _reward: f64) {}

    fn reset(&mut self) {}
}

fn uct_score(tree: &MctsTree, node: usize, exploration_constant: f64) -> f64 {
    let n = &tree.nodes[node];
    if n.visits == 0 {
        return f64::INFINITY;
    }
    let exploit = n.total_reward / n.visits as f64;
    let parent_visits = n.parent.map(|p| tree.nodes[p].visits).unwrap_or(0) as f64;
    let explore = exploration_constant * ((parent_visits + 1e-9).ln() / n.visits as f64).sqrt();
    exploit + explore
}

fn argmax_child(tree: &MctsTree, node: usize, score: impl Fn(&MctsTree, usize) -> f64) -> usize {
    tree.nodes[node]
        .children
        .iter()
        .copied()
        .max_by(|&a, &b| score(tree, a).partial_cmp(&score(tree, b)).unwrap_or(std::cmp::Ordering::Equal))
        .expect("select is only called on a fully-expanded node, which has at least one child")
}

pub struct UctSelection {
    pub exploration_constant: f64,
}

impl UctSelection {
    pub fn new(exploration_constant: f64) -> UctSelection {
        UctSelection { exploration_constant }
    }
}

impl SelectionStrategy for UctSelection {
    fn select(&self, tree: &MctsTree, node: usize) -> usize {
        argmax_child(tree, node, |t, n| uct_score(t, n, self.exploration_constant))
    }
}

/// Adds a heuristic bias, decaying with visit count, toward nodes whose
/// acting team has a player adjacent to a non-neutral ball (i.e. able to
/// kick immediately).
pub struct ProgressiveBiasSelection {
    pub exploration_constant: f64,
    pub heuristic_value: f64,
}

impl ProgressiveBiasSelection {
    pub fn new(exploration_constant: f64, heuristic_value: f64) -> ProgressiveBiasSelection {
        ProgressiveBiasSelection { exploration_constant, heuristic_value }
    }

    fn heuristic(&self, tree: &MctsTree, node: usize) -> f64 {
        let state = &tree.nodes[node].state;
        if state.is_ball_neutral() {
            return 0.0;
        }
        let adjacent = state
            .players_of(state.current_team)
            .any(|p| p.position.is_adjacent(&state.ball.position));
        if adjacent {
            self.heuristic_value
        } else {
            0.0
        }
    }
}

impl SelectionStrategy for ProgressiveBiasSelection {
    fn select(&self, tree: &MctsTree, node: usize) -> usize {
        argmax_child(tree, node, |t, n| {
            let base = uct_score(t, n, self.exploration_constant);
            if t.nodes[n].visits == 0 {
                return base;
            }
            base + self.heuristic(t, n) / (t.nodes[n].visits as f64 + 1.0)
        })
    }
}

/// Replaces Progressive Bias's fixed heuristic with a learned per-(team,
/// move) history score, updated once per rollout on the expanded leaf.
pub struct ProgressiveHistorySelection {
    pub exploration_constant: f64,
    history_table: HashMap<(Team, Move), (f64, u32)>,
}

impl ProgressiveHistorySelection {
    pub fn new(exploration_constant: f64) -> ProgressiveHistorySelection {
        ProgressiveHistorySelection { exploration_constant, history_table: HashMap::new() }
    }

    fn history_bias(&self, team: Team, mv: Move) -> f64 {
        match self.history_table.get(&(team, mv)) {
            Some((total, count)) if *count > 0 => total / *count as f64,
            _ => 0.0,
        }
    }
}

impl SelectionStrategy for ProgressiveHistorySelection {
    fn select(&self, tree: &MctsTree, node: usize) -> usize {
        argmax_child(tree, node, |t, n| {
            if t.nodes[n].visits == 0 {
                return f64::INFINITY;
            }
            let child = &t.nodes[n];
            let avg_reward = child.total_reward / child.visits as f64;
            // The mover is whoever was to move at the parent, not at the
            // child -- `child.state.current_team` is already the other
            // side in every non-extra-turn case, which would key this
            // lookup to the wrong (team, move) pair.
            let team = child.parent.map(|p| t.nodes[p].state.current_team).unwrap_or(child.state.current_team);
            let bias = child.mv.map(|m| self.history_bias(team, m)).unwrap_or(0.0);
            let parent_visits = child.parent.map(|p| t.nodes[p].visits).unwrap_or(0) as f64;
            let exploration = self.exploration_constant * ((parent_visits + 1e-9).ln() / child.visits as f64).sqrt();
            avg_reward + bias + exploration
        })
    }

    fn update_history(&mut self, team: Team, mv: Move, reward: f64) {
        let entry = self.history_table.entry((team, mv)).or_insert((0.0, 0));
        entry.0 += reward;
        entry.1 += 1;
    }

    fn reset(&mut self) {
        self.history_table.clear();
    }
}
