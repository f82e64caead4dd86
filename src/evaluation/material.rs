//! Material counting using "[standard piece valuations]".
//!
//! While not very useful for strong play, this evaluation is stable (fixed
//! piece values), easy to understand and deterministic, which is exactly what
//! scoring truncated random games needs.
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use shakmaty::{Board, Color, Piece, Role};

use crate::evaluation::Value;

const PAWN_VALUE: Value = 1;
const KNIGHT_VALUE: Value = 3;
const BISHOP_VALUE: Value = 3;
const ROOK_VALUE: Value = 5;
const QUEEN_VALUE: Value = 9;

const fn role_value(role: Role) -> Value {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Sum of the values of `color`'s pieces. Kings are not counted.
#[must_use]
pub fn piece_value(board: &Board, color: Color) -> Value {
    Role::ALL
        .into_iter()
        .map(|role| {
            let count = board.by_piece(Piece { color, role }).count();
            role_value(role) * Value::try_from(count).unwrap_or(Value::MAX)
        })
        .sum()
}
