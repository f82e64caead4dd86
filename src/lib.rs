//! Chess move selection with [Monte Carlo Tree Search] under a wall-clock
//! budget.
//!
//! The search itself ([`mcts`]) is game-agnostic and works with any
//! [`environment::Environment`]; [`chess::Game`] plugs the rules of chess
//! into it and [`engine::Engine`] exposes the result over the Universal Chess
//! Interface.
//!
//! ```
//! use std::time::Duration;
//!
//! let reply = mcts_chess::select_move(
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
//!     Some(Duration::from_millis(50)),
//! )
//! .unwrap();
//! assert!(reply.is_some());
//! ```
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Performance is extremely important.
#![deny(clippy::perf)]

use std::time::Duration;

use shadow_rs::shadow;

pub mod chess;
pub mod engine;
pub mod environment;
pub mod evaluation;
pub mod mcts;

shadow!(build);

/// Build profile and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Logs information about the engine version and the build on startup.
pub fn log_engine_info() {
    log::info!("{} {}", env!("CARGO_PKG_NAME"), engine_version());
    log::info!("release build: {}, {FEATURES}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        log::warn!("built with uncommitted changes");
    }
}

/// Picks a move for the player to move in the position given in FEN, using
/// the default search parameters and `budget` (one second if `None`) as the
/// time limit.
///
/// Returns the move in UCI notation or `None` if the game is already over.
///
/// # Errors
///
/// Returns an error if `fen` is not a valid, legal position.
pub fn select_move(fen: &str, budget: Option<Duration>) -> anyhow::Result<Option<String>> {
    let game = chess::Game::from_fen(fen)?;
    let mut config = mcts::Config::default();
    if let Some(budget) = budget {
        config.time = budget;
    }
    Ok(mcts::find_best_move(&game, &config).map(|action| chess::uci(&action)))
}
