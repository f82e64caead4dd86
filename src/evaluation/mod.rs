//! "Static" [evaluation]: estimating the outcome of a position without
//! playing it out.
//!
//! The search only needs it when a simulated game is cut short before it
//! reaches the end, so the estimate is deliberately soft: it never claims a
//! certain win or loss for moderate material imbalances.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

pub mod material;

/// Material balance in pawn units.
pub type Value = i32;

/// Maps material balance from one player's perspective to the expected score
/// for that player in `[0, 1]`, where 0.5 is an even position.
///
/// Every pawn of advantage is worth a hundredth of a point, so the full
/// starting army (39 pawns) is still below a certain win.
#[must_use]
pub fn expected_score(balance: Value) -> f64 {
    let score = f64::from(balance).mul_add(0.01, 0.5);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
