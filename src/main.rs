use std::io;
use std::time::Duration;

use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use mcts_chess::chess::{self, Game};
use mcts_chess::engine::{self, Engine};
use mcts_chess::mcts::{self, Config};

/// Chess engine selecting moves with Monte Carlo Tree Search. Speaks UCI on
/// stdin/stdout when started without a subcommand; logs go to stderr
/// (`RUST_LOG` controls the level).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Exploration constant of the UCT formula.
    #[arg(long, global = true, default_value_t = Config::EXPLORATION)]
    exploration: f64,
    /// Maximum length of a random playout in plies.
    #[arg(long, global = true, default_value_t = Config::ROLLOUT_DEPTH)]
    rollout_depth: u16,
    /// Seed of the random number generator.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs the UCI loop (default).
    Uci,
    /// Searches a fixed set of positions and reports the speed.
    Bench,
    /// Picks a move in a single position and prints it in UCI notation.
    Go {
        /// Position in Forsyth-Edwards Notation.
        #[arg(long, default_value = chess::STARTING_FEN)]
        fen: String,
        /// Search time in milliseconds.
        #[arg(long, default_value_t = 1000)]
        movetime: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .start()?;
    mcts_chess::log_engine_info();

    let config = Config {
        exploration: cli.exploration,
        rollout_depth: cli.rollout_depth,
        seed: cli.seed,
        ..Config::default()
    };

    match cli.command.unwrap_or(Command::Uci) {
        Command::Uci => Engine::new(config).uci_loop(&mut io::stdin().lock(), &mut io::stdout()),
        Command::Bench => engine::bench(&mut io::stdout()),
        Command::Go { fen, movetime } => {
            let game = Game::from_fen(&fen)?;
            let config = Config {
                time: Duration::from_millis(movetime),
                ..config
            };
            match mcts::find_best_move(&game, &config) {
                Some(best_move) => println!("{}", chess::uci(&best_move)),
                None => println!("(none)"),
            }
            Ok(())
        },
    }
}
