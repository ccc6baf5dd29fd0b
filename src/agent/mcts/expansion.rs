//! Leaf expansion: adds one untried child, chosen at random, to a node that
//! is not yet fully expanded. Grounded on `strategies/expansion.py`'s
//! `RandomExpansion`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::node::MctsTree;
use crate::error::Result;

pub trait ExpansionStrategy {
    fn expand(&self, tree: &mut MctsTree, node: usize, rng: &mut impl Rng) -> Result<usize>;
}

pub struct RandomExpansion;

impl ExpansionStrategy for RandomExpansion {
    fn expand(&self, tree: &mut MctsTree, node: usize, rng: &mut impl Rng) -> Result<usize> {
        let untried = tree.untried_moves(node);
        let mv = *untried
            .choose(rng)
            .expect("expand is only called on a node with at least one untried move");
        tree.add_child(node, mv)
    }
}
