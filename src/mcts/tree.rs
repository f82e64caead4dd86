//! Search tree stored as an arena: nodes live in a single growable vector and
//! refer to each other by index.
//!
//! Children are owned by their parent in the sense that they are only ever
//! created through [`Tree::expand`] and never detached; the parent index is
//! just a lookup aid for walking back to the root. The whole tree is dropped
//! at once together with the vector.

use std::fmt;

use crate::environment::{Environment, Player};
use crate::mcts::simulation::Playout;

/// Position of a node in the arena. Stable for the lifetime of the tree.
pub type NodeIndex = usize;

/// A state reached during the search.
///
/// Statistics are accumulated from the perspective of
/// [`Node::player_just_moved`]: `score / visits` is the expected result of
/// the game for the player whose move led to this node.
#[derive(Debug)]
pub struct Node<A> {
    parent: Option<NodeIndex>,
    /// Children in expansion order. Tie-breaks during selection depend on
    /// this order.
    children: Vec<NodeIndex>,
    action: Option<A>,
    player_just_moved: Player,
    untried: Vec<A>,
    visits: u64,
    score: f64,
}

impl<A> Node<A> {
    fn new<E: Environment<Action = A>>(
        parent: Option<NodeIndex>,
        action: Option<A>,
        state: &E,
    ) -> Self {
        // Terminal states have nothing to expand even if the rules still
        // report moves (e.g. insufficient material).
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.actions()
        };
        Self {
            parent,
            children: Vec::new(),
            action,
            player_just_moved: !state.turn(),
            untried,
            visits: 0,
            score: 0.0,
        }
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Expanded children in expansion order.
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// The move that produced this node from its parent, `None` for the root.
    #[must_use]
    pub const fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// The player whose move produced this node. For the root, this is the
    /// opponent of the player to move.
    #[must_use]
    pub const fn player_just_moved(&self) -> Player {
        self.player_just_moved
    }

    /// Legal moves that have not been expanded into children yet.
    #[must_use]
    pub fn untried(&self) -> &[A] {
        &self.untried
    }

    /// Number of completed search cycles that went through this node.
    #[must_use]
    pub const fn visits(&self) -> u64 {
        self.visits
    }

    /// Accumulated results credited to [`Node::player_just_moved`], each in
    /// `[0, 1]`.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Average result for [`Node::player_just_moved`], 0 for unvisited
    /// nodes.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score / self.visits as f64
        }
    }

    /// Returns `true` if every legal move has a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

/// All nodes explored by a single search.
#[derive(Debug)]
pub struct Tree<A> {
    nodes: Vec<Node<A>>,
}

impl<A: Clone + Eq + fmt::Debug> Tree<A> {
    /// Index of the root node.
    pub const ROOT: NodeIndex = 0;

    /// Creates a tree consisting of the root only.
    #[must_use]
    pub fn new<E: Environment<Action = A>>(root: &E) -> Self {
        Self {
            nodes: vec![Node::new(None, None, root)],
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Trees always contain at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn root(&self) -> &Node<A> {
        &self.nodes[Self::ROOT]
    }

    /// # Panics
    ///
    /// Panics if the index does not belong to this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node<A> {
        &self.nodes[index]
    }

    /// Iterates over all nodes with their indices, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node<A>)> {
        self.nodes.iter().enumerate()
    }

    /// Returns the `position`-th child of `node`.
    #[must_use]
    pub fn child_of(&self, node: NodeIndex, position: usize) -> Option<NodeIndex> {
        self.nodes[node].children.get(position).copied()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn parent_of(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes[node].parent
    }

    /// Moves leading from the root to `node`.
    #[must_use]
    pub fn line(&self, node: NodeIndex) -> Vec<A> {
        let mut line = Vec::new();
        let mut current = Some(node);
        while let Some(index) = current {
            if let Some(action) = &self.nodes[index].action {
                line.push(action.clone());
            }
            current = self.nodes[index].parent;
        }
        line.reverse();
        line
    }

    /// Materializes one untried move of `parent` into a child. `state` is the
    /// state after `action` was played.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not an untried move of `parent`: the search only
    /// expands moves the rules reported as legal.
    pub fn expand<E: Environment<Action = A>>(
        &mut self,
        parent: NodeIndex,
        action: A,
        state: &E,
    ) -> NodeIndex {
        let position = self.nodes[parent]
            .untried
            .iter()
            .position(|candidate| *candidate == action)
            .unwrap_or_else(|| panic!("{action:?} is not an untried move of node {parent}"));
        drop(self.nodes[parent].untried.swap_remove(position));

        let child = self.nodes.len();
        self.nodes.push(Node::new(Some(parent), Some(action), state));
        self.nodes[parent].children.push(child);
        child
    }

    /// Credits the result of a simulation to every node on the path from
    /// `leaf` up to and including the root. Each node receives the result
    /// from the perspective of its own [`Node::player_just_moved`].
    pub fn backpropagate(&mut self, leaf: NodeIndex, playout: &Playout) {
        let mut current = Some(leaf);
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            node.visits += 1;
            node.score += playout.score_for(node.player_just_moved);
            current = node.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Outcome;
    use crate::mcts::testing::Nim;

    #[test]
    fn root() {
        let tree = Tree::new(&Nim::new(3));
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root().parent(), None);
        assert_eq!(tree.root().action(), None);
        assert_eq!(tree.root().player_just_moved(), Player::Black);
        assert_eq!(tree.root().untried(), &[1, 2, 3]);
        assert_eq!(tree.root().visits(), 0);
        assert!(tree.line(Tree::<u8>::ROOT).is_empty());
    }

    #[test]
    fn terminal_root_has_nothing_to_expand() {
        let tree = Tree::new(&Nim::new(0));
        assert!(tree.root().is_fully_expanded());
        assert!(tree.root().children().is_empty());
    }

    #[test]
    fn expand() {
        let mut state = Nim::new(3);
        let mut tree = Tree::new(&state);

        state.apply(&2);
        let child = tree.expand(Tree::<u8>::ROOT, 2, &state);
        assert_eq!(child, 1);
        assert_eq!(tree.parent_of(child), Some(Tree::<u8>::ROOT));
        assert_eq!(tree.child_of(Tree::<u8>::ROOT, 0), Some(child));
        assert_eq!(tree.child_of(Tree::<u8>::ROOT, 1), None);
        assert_eq!(tree.node(child).action(), Some(&2));
        assert_eq!(tree.node(child).player_just_moved(), Player::White);
        assert_eq!(tree.node(child).untried(), &[1]);

        let mut untried = tree.root().untried().to_vec();
        untried.sort_unstable();
        assert_eq!(untried, vec![1, 3]);

        state.apply(&1);
        let grandchild = tree.expand(child, 1, &state);
        assert_eq!(tree.line(grandchild), vec![2, 1]);
        assert!(tree.node(grandchild).is_fully_expanded());
    }

    #[test]
    #[should_panic(expected = "is not an untried move")]
    fn expand_twice() {
        let state = Nim::new(3);
        let mut tree = Tree::new(&state);
        let _ = tree.expand(Tree::<u8>::ROOT, 1, &state);
        let _ = tree.expand(Tree::<u8>::ROOT, 1, &state);
    }

    #[test]
    fn backpropagate_per_perspective() {
        let mut state = Nim::new(3);
        let mut tree = Tree::new(&state);
        state.apply(&1);
        let child = tree.expand(Tree::<u8>::ROOT, 1, &state);
        state.apply(&2);
        let grandchild = tree.expand(child, 2, &state);

        // Black took the last stone.
        tree.backpropagate(
            grandchild,
            &Playout::Finished(Outcome::Decisive {
                winner: Player::Black,
            }),
        );
        assert_eq!(tree.node(grandchild).visits(), 1);
        assert!((tree.node(grandchild).score() - 1.0).abs() < f64::EPSILON);
        assert!(tree.node(child).score().abs() < f64::EPSILON);
        assert!((tree.root().score() - 1.0).abs() < f64::EPSILON);
        assert_eq!(tree.root().visits(), 1);

        tree.backpropagate(child, &Playout::Finished(Outcome::Draw));
        assert_eq!(tree.node(child).visits(), 2);
        assert!((tree.node(child).mean_score() - 0.25).abs() < f64::EPSILON);
        assert_eq!(tree.root().visits(), 2);
        assert_eq!(tree.node(grandchild).visits(), 1);
    }
}
