//! Interface between the search and the rules of the game it is playing.
//!
//! The search never constructs moves on its own: every action it applies was
//! previously returned by [`Environment::actions`] for the very same state.
//! Implementations are expected to treat anything else as a broken contract
//! and panic.

use std::fmt;
use std::ops::Not;

/// Two-player games are played between White (having the advantage of the
/// first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// One of the players won.
    Decisive {
        #[allow(missing_docs)]
        winner: Player,
    },
    /// Nobody won: stalemate, insufficient material, etc.
    Draw,
}

impl Outcome {
    /// Returns the winner, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Decisive { winner } => Some(winner),
            Self::Draw => None,
        }
    }
}

/// Rules of a two-player, perfect-information, turn-alternating game.
///
/// Cloning the state has to be cheap and produce a fully independent copy:
/// every search cycle plays on its own clone of the root.
pub trait Environment: Clone {
    /// A move in the game.
    type Action: Clone + Eq + fmt::Debug;

    /// Returns all legal actions in the current state. The list is empty for
    /// terminal states and may be empty for others, too (e.g. stalemate).
    fn actions(&self) -> Vec<Self::Action>;

    /// Plays the action, which must have been returned by
    /// [`Environment::actions`] for the current state.
    ///
    /// # Panics
    ///
    /// Panics if the action is not legal.
    fn apply(&mut self, action: &Self::Action);

    /// Returns `true` if the game is over.
    fn is_terminal(&self) -> bool;

    /// Returns the result of a finished game and `None` while it is still
    /// going.
    fn outcome(&self) -> Option<Outcome>;

    /// Returns the player to move.
    fn turn(&self) -> Player;

    /// Sum of the static values of the pieces `player` has on the board. It is
    /// only used to estimate the state of games cut short during simulation.
    fn material(&self, _player: Player) -> i32 {
        0
    }
}
