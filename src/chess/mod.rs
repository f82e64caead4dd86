//! Rules of chess, backed by [`shakmaty`].
//!
//! [`Game`] is the [`Environment`] the search plays on. Positions are read in
//! [Forsyth-Edwards Notation] and moves are read and written in the UCI long
//! algebraic notation (e.g. `e2e4`, `e7e8q`, `e1g1` for castling).
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

use anyhow::{anyhow, Context};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, Position};
pub use shakmaty::Move;

use crate::environment::{Environment, Outcome, Player};
use crate::evaluation::material;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl From<Color> for Player {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::White => Self::White,
            Player::Black => Self::Black,
        }
    }
}

/// Serializes a move in [UCI format].
///
/// [UCI format]: https://www.chessprogramming.org/Algebraic_Chess_Notation#UCI
#[must_use]
pub fn uci(action: &Move) -> String {
    action.to_uci(CastlingMode::Standard).to_string()
}

/// A legal chess position together with the player to move.
#[derive(Clone, Debug, Default)]
pub struct Game {
    position: Chess,
}

impl Game {
    /// Creates the standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        Self::default()
    }

    /// Parses a position from FEN. Trimmed FEN (without halfmove clock and
    /// fullmove counter) is accepted, too.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid FEN or describes an illegal
    /// position.
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let setup: Fen = fen
            .trim()
            .parse()
            .with_context(|| format!("malformed FEN: '{fen}'"))?;
        let position: Chess = setup
            .into_position(CastlingMode::Standard)
            .map_err(|e| anyhow!("illegal position '{fen}': {e}"))?;
        Ok(Self { position })
    }

    /// Underlying [`shakmaty`] position.
    #[must_use]
    pub const fn position(&self) -> &Chess {
        &self.position
    }

    /// Finds the legal move serialized in UCI format.
    ///
    /// # Errors
    ///
    /// Returns an error if no legal move in this position has the given
    /// notation.
    pub fn parse_move(&self, notation: &str) -> anyhow::Result<Move> {
        self.position
            .legal_moves()
            .into_iter()
            .find(|action| uci(action) == notation)
            .ok_or_else(|| anyhow!("'{notation}' is not a legal move in this position"))
    }

    /// Parses and plays a move given in UCI format.
    ///
    /// # Errors
    ///
    /// Returns an error if the move is not legal.
    pub fn make_move(&mut self, notation: &str) -> anyhow::Result<()> {
        let action = self.parse_move(notation)?;
        self.apply(&action);
        Ok(())
    }
}

impl Environment for Game {
    type Action = Move;

    fn actions(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    fn apply(&mut self, action: &Move) {
        assert!(
            self.position.is_legal(action),
            "rules rejected move {} which was previously reported as legal",
            uci(action)
        );
        self.position.play_unchecked(action);
    }

    fn is_terminal(&self) -> bool {
        self.position.is_game_over()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.position.outcome().map(|outcome| match outcome {
            shakmaty::Outcome::Decisive { winner } => Outcome::Decisive {
                winner: winner.into(),
            },
            shakmaty::Outcome::Draw => Outcome::Draw,
        })
    }

    fn turn(&self) -> Player {
        self.position.turn().into()
    }

    fn material(&self, player: Player) -> i32 {
        material::piece_value(self.position.board(), player.into())
    }
}
