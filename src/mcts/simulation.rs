//! Default policy: plays random moves from a freshly expanded node and scores
//! the result.

use rand::Rng;

use crate::environment::{Environment, Outcome, Player};
use crate::evaluation;

/// Result of a single simulated game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Playout {
    /// The game reached its end.
    Finished(Outcome),
    /// The game was cut off before the end and its result was estimated from
    /// the material left on the board.
    Estimated {
        /// Perspective of the estimate.
        player: Player,
        /// Expected result for `player`, in `[0, 1]`.
        score: f64,
    },
}

impl Playout {
    /// Result of the simulation for `player`: 1 for a win, 0 for a loss,
    /// 0.5 for a draw and the complementary estimate otherwise.
    #[must_use]
    pub fn score_for(&self, player: Player) -> f64 {
        match *self {
            Self::Finished(outcome) => match outcome.winner() {
                Some(winner) if winner == player => 1.0,
                Some(_) => 0.0,
                None => 0.5,
            },
            Self::Estimated {
                player: perspective,
                score,
            } => {
                if perspective == player {
                    score
                } else {
                    1.0 - score
                }
            },
        }
    }
}

/// Plays uniformly random legal moves on `state` until the game ends or
/// `max_depth` plies are played. Cut off games are estimated from
/// `perspective`'s point of view.
pub(super) fn rollout<E: Environment, R: Rng>(
    state: &mut E,
    perspective: Player,
    max_depth: u16,
    rng: &mut R,
) -> Playout {
    let mut depth = 0;
    loop {
        if state.is_terminal() {
            return Playout::Finished(state.outcome().unwrap_or(Outcome::Draw));
        }
        if depth >= max_depth {
            return estimate(state, perspective);
        }
        let actions = state.actions();
        if actions.is_empty() {
            return Playout::Finished(state.outcome().unwrap_or(Outcome::Draw));
        }
        state.apply(&actions[rng.gen_range(0..actions.len())]);
        depth += 1;
    }
}

fn estimate<E: Environment>(state: &E, perspective: Player) -> Playout {
    let balance = state
        .material(perspective)
        .saturating_sub(state.material(!perspective));
    Playout::Estimated {
        player: perspective,
        score: evaluation::expected_score(balance),
    }
}
