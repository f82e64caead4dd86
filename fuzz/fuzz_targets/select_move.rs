#![no_main]
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use mcts_chess::chess::Game;
use mcts_chess::environment::Environment;
use mcts_chess::mcts::{self, Config};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(game) = Game::from_fen(input) else {
        return;
    };
    let config = Config {
        time: Duration::MAX,
        iterations: Some(16),
        seed: Some(0),
        ..Config::default()
    };
    match mcts::find_best_move(&game, &config) {
        Some(best_move) => assert!(game.actions().contains(&best_move)),
        None => assert!(game.is_terminal()),
    }
});
