//! Splitting the remaining clock time into a budget for the current move.

use std::time::Duration;

/// Number of moves the remaining time is spread over when the GUI does not
/// send `movestogo`.
const DEFAULT_MOVES_TO_GO: u32 = 30;

const MINIMUM: Duration = Duration::from_millis(1);

/// Returns the search budget for a move given the time left on the clock of
/// the player to move.
///
/// The budget is an even share of the remaining time plus half of the
/// increment, but never more than half of the remaining time.
pub(super) fn allocate(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
) -> Duration {
    let moves_to_go = moves_to_go
        .filter(|&moves| moves > 0)
        .unwrap_or(DEFAULT_MOVES_TO_GO);
    let share = remaining / moves_to_go + increment / 2;
    share.min(remaining / 2).max(MINIMUM)
}
