//! Small game for testing the search without chess.

use crate::environment::{Environment, Outcome, Player};

/// Single-pile Nim: players alternate taking one to three stones, whoever
/// takes the last stone wins. White moves first.
#[derive(Clone, Debug)]
pub(crate) struct Nim {
    stones: u8,
    turn: Player,
}

impl Nim {
    pub(crate) const fn new(stones: u8) -> Self {
        Self {
            stones,
            turn: Player::White,
        }
    }
}

impl Environment for Nim {
    type Action = u8;

    fn actions(&self) -> Vec<u8> {
        (1..=self.stones.min(3)).collect()
    }

    fn apply(&mut self, action: &u8) {
        assert!(
            (1..=self.stones.min(3)).contains(action),
            "can not take {action} out of {} stones",
            self.stones
        );
        self.stones -= action;
        self.turn = !self.turn;
    }

    fn is_terminal(&self) -> bool {
        self.stones == 0
    }

    fn outcome(&self) -> Option<Outcome> {
        self.is_terminal().then_some(Outcome::Decisive {
            winner: !self.turn,
        })
    }

    fn turn(&self) -> Player {
        self.turn
    }
}
