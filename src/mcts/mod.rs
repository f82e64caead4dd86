//! Implements [Monte Carlo Tree Search] (MCTS) with the UCT selection rule and
//! random rollouts.
//!
//! Every search cycle goes through four phases:
//!
//! 1. Selection: starting from the root, repeatedly pick the child with the
//!    highest upper confidence bound until reaching a node that still has
//!    untried moves (or a terminal node).
//! 2. Expansion: add one random untried move of that node to the tree.
//! 3. Simulation: play random moves from the new node until the game ends or
//!    the depth limit is reached.
//! 4. Backpropagation: credit the result to every node on the path back to the
//!    root, each from the perspective of the player who moved into it.
//!
//! Cycles repeat until the time budget (checked between cycles) or the
//! optional cycle limit is exhausted. The move played is the most visited
//! child of the root. Each search builds its own tree and drops it when done.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, log_enabled, trace, Level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::environment::Environment;

mod policy;
mod simulation;
#[cfg(test)]
mod testing;
mod tree;

pub use simulation::Playout;
pub use tree::{Node, NodeIndex, Tree};

/// Parameters of the search.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Exploration constant of the UCT formula.
    pub exploration: f64,
    /// Maximum number of plies played in a single simulation.
    pub rollout_depth: u16,
    /// Wall-clock budget. It is checked after every cycle, so the search may
    /// run slightly longer.
    pub time: Duration,
    /// Maximum number of search cycles, no limit if `None`.
    pub iterations: Option<u64>,
    /// Seed of the random number generator. Searches with the same seed and
    /// cycle count are reproducible.
    pub seed: Option<u64>,
}

impl Config {
    /// Default exploration constant: $\sqrt{2}$.
    pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;
    #[allow(missing_docs)]
    pub const ROLLOUT_DEPTH: u16 = 50;
    #[allow(missing_docs)]
    pub const TIME: Duration = Duration::from_millis(1000);

    /// Creates the random number generator for a search.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration: Self::EXPLORATION,
            rollout_depth: Self::ROLLOUT_DEPTH,
            time: Self::TIME,
            iterations: None,
            seed: None,
        }
    }
}

/// Statistics of a candidate move at the root.
#[derive(Clone, Debug)]
pub struct Candidate<A> {
    #[allow(missing_docs)]
    pub action: A,
    /// Number of cycles that went through this move.
    pub visits: u64,
    /// Average result for the player to move at the root.
    pub mean_score: f64,
}

/// Finished search: the tree it built and how long it took.
#[derive(Debug)]
pub struct Search<A> {
    tree: Tree<A>,
    cycles: u64,
    elapsed: Duration,
}

impl<A: Clone + Eq + fmt::Debug> Search<A> {
    /// Runs the search from `root` until the limits in `config` are reached.
    ///
    /// A terminal root yields an empty search without any cycles. Otherwise at
    /// least one cycle is completed regardless of the time budget.
    pub fn run<E: Environment<Action = A>, R: Rng>(
        root: &E,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let timer = Instant::now();
        let mut tree = Tree::new(root);
        let mut cycles = 0;

        if root.is_terminal() {
            debug!("search started from a terminal position: nothing to do");
            return Self {
                tree,
                cycles,
                elapsed: timer.elapsed(),
            };
        }

        loop {
            let mut state = root.clone();
            let selected = policy::select(&tree, &mut state, config.exploration);
            let leaf = policy::expand(&mut tree, selected, &mut state, rng);
            let perspective = tree.node(leaf).player_just_moved();
            let playout =
                simulation::rollout(&mut state, perspective, config.rollout_depth, rng);
            tree.backpropagate(leaf, &playout);
            cycles += 1;

            if config.iterations.is_some_and(|limit| cycles >= limit)
                || timer.elapsed() >= config.time
            {
                break;
            }
        }

        let search = Self {
            tree,
            cycles,
            elapsed: timer.elapsed(),
        };
        debug!(
            "search finished: {} cycles, {} nodes in {} ms",
            search.cycles,
            search.tree.len(),
            search.elapsed.as_millis()
        );
        if log_enabled!(Level::Trace) {
            for candidate in search.candidates() {
                trace!(
                    "{:?}: visits {} score {:.3}",
                    candidate.action,
                    candidate.visits,
                    candidate.mean_score
                );
            }
        }
        search
    }

    /// The most visited move at the root, `None` if the root had no moves.
    #[must_use]
    pub fn best_move(&self) -> Option<A> {
        policy::robust_child(&self.tree, Tree::<A>::ROOT)
            .and_then(|child| self.tree.node(child).action().cloned())
    }

    /// Root moves in expansion order.
    #[must_use]
    pub fn candidates(&self) -> Vec<Candidate<A>> {
        self.tree
            .root()
            .children()
            .iter()
            .filter_map(|&child| {
                let node = self.tree.node(child);
                node.action().map(|action| Candidate {
                    action: action.clone(),
                    visits: node.visits(),
                    mean_score: node.mean_score(),
                })
            })
            .collect()
    }

    /// Number of completed cycles.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Wall-clock time spent searching.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn tree(&self) -> &Tree<A> {
        &self.tree
    }
}

/// Searches `root` with the generator seeded from `config` and returns the
/// move to play, or `None` if the game is already over.
#[must_use]
pub fn find_best_move<E: Environment>(root: &E, config: &Config) -> Option<E::Action> {
    let mut rng = config.rng();
    Search::run(root, config, &mut rng).best_move()
}
