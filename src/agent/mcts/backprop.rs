//! Walks a leaf's parent chain, updating visit counts and total reward.
//! Grounded on `strategies/backpropagation.py`'s `StandardBackpropagation`.

use super::node::MctsTree;
use super::selection::SelectionStrategy;

/// Updates every ancestor of `leaf` (inclusive) with `reward`, and lets
/// `selection` record history for the leaf's own (team, move) exactly once
/// per rollout -- matching the Python original's `is_first` guard.
pub fn backpropagate(tree: &mut MctsTree, leaf: usize, reward: f64, selection: &mut dyn SelectionStrategy) {
    if let (Some(mv), Some(parent)) = (tree.nodes[leaf].mv, tree.nodes[leaf].parent) {
        let team = tree.nodes[parent].state.current_team;
        selection.update_history(team, mv, reward);
    }

    let mut current = Some(leaf);
    while let Some(idx) = current {
        let node = &mut tree.nodes[idx];
        node.visits += 1;
        node.total_reward += reward;
        current = node.parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::mcts::selection::UctSelection;
    use crate::movegen::legal_moves;
    use crate::state::{GameState, Level};

    #[test]
    fn backpropagate_updates_every_ancestor() {
        let mut tree = MctsTree::new(GameState::new_game(Level::One));
        let mv = legal_moves(&tree.nodes[MctsTree::ROOT].state)[0];
        let child = tree.add_child(MctsTree::ROOT, mv).unwrap();
        let mut selection = UctSelection::new(2.0);
        backpropagate(&mut tree, child, 1.0, &mut selection);
        assert_eq!(tree.nodes[child].visits, 1);
        assert_eq!(tree.nodes[MctsTree::ROOT].visits, 1);
        assert_eq!(tree.nodes[MctsTree::ROOT].total_reward, 1.0);
    }
}
