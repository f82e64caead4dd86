//! Tree policy: descending the tree with [UCT] and growing it by one node per
//! search cycle, plus the final choice of the move to play.
//!
//! Children are always scanned in expansion order and a candidate replaces the
//! current best only if it is strictly better, so ties go to the child that
//! was expanded first.
//!
//! [UCT]: https://www.chessprogramming.org/UCT

use std::fmt;

use rand::Rng;

use crate::environment::Environment;
use crate::mcts::tree::{Node, NodeIndex, Tree};

/// Upper confidence bound of `child`: its average score plus an exploration
/// bonus that shrinks as the child is visited more often. Unvisited children
/// are infinitely urgent.
pub(super) fn uct<A>(child: &Node<A>, parent_visits: u64, exploration: f64) -> f64 {
    if child.visits() == 0 {
        return f64::INFINITY;
    }
    let visits = child.visits() as f64;
    let bonus = ((parent_visits as f64).ln() / visits).sqrt();
    exploration.mul_add(bonus, child.mean_score())
}

/// Returns the child of `node` with the highest [`uct`] value.
pub(super) fn select_child<A: Clone + Eq + fmt::Debug>(
    tree: &Tree<A>,
    node: NodeIndex,
    exploration: f64,
) -> Option<NodeIndex> {
    let parent_visits = tree.node(node).visits();
    let mut best: Option<(NodeIndex, f64)> = None;
    for &child in tree.node(node).children() {
        let priority = uct(tree.node(child), parent_visits, exploration);
        if best.map_or(true, |(_, best_priority)| priority > best_priority) {
            best = Some((child, priority));
        }
    }
    best.map(|(child, _)| child)
}

/// Walks down from the root while the current node is fully expanded and has
/// children, playing the moves on `state`. Stops at a node with untried moves
/// or at a leaf.
pub(super) fn select<E: Environment>(
    tree: &Tree<E::Action>,
    state: &mut E,
    exploration: f64,
) -> NodeIndex {
    let mut current = Tree::<E::Action>::ROOT;
    while tree.node(current).is_fully_expanded() {
        let Some(child) = select_child(tree, current, exploration) else {
            break;
        };
        if let Some(action) = tree.node(child).action() {
            state.apply(action);
        }
        current = child;
    }
    current
}

/// Expands a uniformly random untried move of `node`, playing it on `state`.
/// Returns `node` itself if there is nothing to expand.
pub(super) fn expand<E: Environment, R: Rng>(
    tree: &mut Tree<E::Action>,
    node: NodeIndex,
    state: &mut E,
    rng: &mut R,
) -> NodeIndex {
    let untried = tree.node(node).untried();
    if untried.is_empty() || state.is_terminal() {
        return node;
    }
    let action = untried[rng.gen_range(0..untried.len())].clone();
    state.apply(&action);
    tree.expand(node, action, &*state)
}

/// Returns the most visited child of `node` (the "robust child").
pub(super) fn robust_child<A: Clone + Eq + fmt::Debug>(
    tree: &Tree<A>,
    node: NodeIndex,
) -> Option<NodeIndex> {
    let mut best: Option<NodeIndex> = None;
    for &child in tree.node(node).children() {
        if best.map_or(true, |best| tree.node(child).visits() > tree.node(best).visits()) {
            best = Some(child);
        }
    }
    best
}
