//! Implementing [`bench`] command is a [requirement for OpenBench], which is an
//! incredibly important tool for measuring the performance and strength of the
//! engine.
//!
//! [requirement for OpenBench]: https://github.com/AndyGrant/OpenBench/wiki/Requirements-For-Public-Engines#basic-requirements

use std::io::Write;
use std::time::{Duration, Instant};

use crate::chess::Game;
use crate::mcts::{Config, Search};

const POSITIONS: [&str; 3] = [
    crate::chess::STARTING_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

/// Number of search cycles per position.
const CYCLES: u64 = 5_000;

/// Runs search on a small set of positions to provide an estimate of engine's
/// performance. The searches are seeded, so the node count is stable between
/// runs of the same build.
///
/// NOTE: This function **has to run less than 60 seconds**.
///
/// See <https://github.com/AndyGrant/OpenBench/blob/master/Client/bench.py> for
/// more details.
///
/// # Errors
///
/// Returns an error if writing to `output` fails.
pub fn bench(output: &mut impl Write) -> anyhow::Result<()> {
    let config = Config {
        time: Duration::MAX,
        iterations: Some(CYCLES),
        seed: Some(0),
        ..Config::default()
    };
    let mut total_nodes = 0;
    let timer = Instant::now();

    for fen in POSITIONS {
        let game = Game::from_fen(fen)?;
        let search = Search::run(&game, &config, &mut config.rng());
        total_nodes += search.cycles();
    }

    let elapsed = timer.elapsed().as_secs_f64().max(f64::EPSILON);
    writeln!(
        output,
        "{} nodes {} nps",
        total_nodes,
        (total_nodes as f64 / elapsed) as u64,
    )?;
    Ok(())
}
