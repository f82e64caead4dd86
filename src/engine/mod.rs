//! The engine puts all pieces together. It implements the [Universal Chess
//! Interface] (UCI) for communication with the client (e.g. tournament runner
//! with other engines or GUI/Lichess endpoint).
//!
//! [`Engine::uci_loop`] is the "main loop" of the engine which communicates
//! with the environment and executes commands from the input stream.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

use std::io::{BufRead, Write};
use std::time::Duration;

use log::warn;

use crate::chess::{self, Game};
use crate::engine::uci::{Command, EngineOption, Limits, OptionValue};
use crate::environment::{Environment, Player};
use crate::mcts::{Config, Search};

mod openbench;
mod time;
mod uci;

pub use openbench::bench;

/// The Engine connects everything together and handles commands sent by the
/// UCI server, including I/O.
#[derive(Debug)]
pub struct Engine {
    game: Game,
    config: Config,
    debug: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    /// Creates a new instance of the engine with the starting position and
    /// `config` as the default search parameters.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            game: Game::starting(),
            config,
            debug: false,
        }
    }

    /// Continuously reads the input stream and executes sent UCI commands until
    /// "quit" is sent or the input is closed.
    ///
    /// The implementation here does not aim to be complete and exhaustive,
    /// because the main goal is to make the engine work in relatively
    /// simple setups.
    ///
    /// Searching blocks the loop: `go` returns `bestmove` only after the time
    /// budget is spent, so `stop` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails.
    pub fn uci_loop(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF reached.
                break;
            }

            match Command::parse(&line) {
                Command::Uci => self.handle_uci(output)?,
                Command::Debug { on } => self.debug = on,
                Command::IsReady => writeln!(output, "readyok")?,
                Command::SetOption { option, value } => self.handle_setoption(&option, &value),
                Command::SetPosition { fen, moves } => {
                    self.handle_position(fen.as_deref(), &moves, output)?;
                },
                Command::NewGame => self.game = Game::starting(),
                Command::Go(limits) => self.handle_go(&limits, output)?,
                Command::Bench => bench(output)?,
                // Search is synchronous: there is nothing to stop.
                Command::Stop => {},
                Command::Quit => break,
                Command::Unknown(command) => {
                    if !command.is_empty() {
                        writeln!(output, "info string Unsupported command: {command}")?;
                    }
                },
            }
            output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `uci` handshake command by identifying the engine.
    fn handle_uci(&self, output: &mut impl Write) -> anyhow::Result<()> {
        writeln!(
            output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(
            output,
            "option name Exploration type string default {}",
            self.config.exploration
        )?;
        writeln!(
            output,
            "option name RolloutDepth type spin default {} min 0 max {}",
            self.config.rollout_depth,
            u16::MAX
        )?;
        writeln!(output, "option name Seed type string default <none>")?;
        writeln!(output, "uciok")?;
        Ok(())
    }

    fn handle_setoption(&mut self, option: &EngineOption, value: &OptionValue) {
        match (option, value) {
            (EngineOption::Exploration, OptionValue::Float(exploration)) => {
                self.config.exploration = *exploration;
            },
            (EngineOption::RolloutDepth, OptionValue::Integer(depth)) => {
                self.config.rollout_depth = u16::try_from(*depth).unwrap_or(u16::MAX);
            },
            (EngineOption::Seed, OptionValue::Integer(seed)) => self.config.seed = Some(*seed),
            _ => warn!("ignoring option {option:?} with value {value:?}"),
        }
    }

    /// Changes the position of the board to the one specified in the command.
    /// Invalid positions and moves are reported and skipped.
    fn handle_position(
        &mut self,
        fen: Option<&str>,
        moves: &[String],
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        let mut game = match fen {
            None => Game::starting(),
            Some(fen) => match Game::from_fen(fen) {
                Ok(game) => game,
                Err(e) => {
                    warn!("rejected position: {e:#}");
                    writeln!(output, "info string Invalid position: {e:#}")?;
                    return Ok(());
                },
            },
        };
        for next_move in moves {
            if let Err(e) = game.make_move(next_move) {
                warn!("rejected move: {e:#}");
                writeln!(output, "info string Unexpected UCI move: {e:#}")?;
                break;
            }
        }
        self.game = game;
        Ok(())
    }

    /// Search parameters for a `go` command: explicit move time wins, then the
    /// clock of the player to move, then the configured default budget.
    fn search_config(&self, limits: &Limits) -> Config {
        let mut config = self.config.clone();
        let (remaining, increment) = match self.game.turn() {
            Player::White => (limits.wtime, limits.winc),
            Player::Black => (limits.btime, limits.binc),
        };
        if let Some(movetime) = limits.movetime {
            config.time = Duration::from_millis(movetime);
        } else if let Some(remaining) = remaining {
            config.time = time::allocate(
                Duration::from_millis(remaining),
                Duration::from_millis(increment.unwrap_or(0)),
                limits.movestogo,
            );
        } else if limits.nodes.is_some() {
            config.time = Duration::MAX;
        } else if limits.infinite {
            warn!("infinite search is not supported, using the default budget");
        }
        if let Some(nodes) = limits.nodes {
            config.iterations = Some(nodes.max(1));
        }
        config
    }

    fn handle_go(&self, limits: &Limits, output: &mut impl Write) -> anyhow::Result<()> {
        let config = self.search_config(limits);
        let search = Search::run(&self.game, &config, &mut config.rng());

        let elapsed = search.elapsed();
        writeln!(
            output,
            "info nodes {} time {} nps {}",
            search.cycles(),
            elapsed.as_millis(),
            (search.cycles() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64,
        )?;
        if self.debug {
            for candidate in search.candidates() {
                writeln!(
                    output,
                    "info string {} visits {} score {:.3}",
                    chess::uci(&candidate.action),
                    candidate.visits,
                    candidate.mean_score
                )?;
            }
        }
        match search.best_move() {
            Some(best_move) => writeln!(output, "bestmove {}", chess::uci(&best_move))?,
            // The game is over: UCI null move.
            None => writeln!(output, "bestmove 0000")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut Engine, commands: &str) -> String {
        let mut input = commands.as_bytes();
        let mut output = Vec::new();
        engine.uci_loop(&mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn seeded() -> Engine {
        Engine::new(Config {
            seed: Some(0),
            ..Config::default()
        })
    }

    #[test]
    fn handshake() {
        let output = run(&mut Engine::default(), "uci\nisready\nquit\n");
        assert!(output.contains("id name mcts-chess"));
        assert!(output.contains("option name Exploration"));
        assert!(output.contains("uciok"));
        assert!(output.ends_with("readyok\n"));
    }

    #[test]
    fn stops_at_quit() {
        let output = run(&mut Engine::default(), "quit\nisready\n");
        assert!(output.is_empty());
    }

    #[test]
    fn unsupported_command() {
        let output = run(&mut Engine::default(), "foo bar\n\n");
        assert_eq!(output, "info string Unsupported command: foo bar\n");
    }

    #[test]
    fn position_with_moves() {
        let mut engine = Engine::default();
        let _ = run(&mut engine, "position startpos moves e2e4 e7e5 g1f3\n");
        assert_eq!(engine.game.turn(), Player::Black);
        assert!(engine.game.parse_move("b8c6").is_ok());
    }

    #[test]
    fn invalid_position_is_ignored() {
        let mut engine = Engine::default();
        let _ = run(&mut engine, "position startpos moves e2e4\n");
        let output = run(&mut engine, "position fen 8/8/8 w - - 0 1\n");
        assert!(output.starts_with("info string Invalid position"));
        assert_eq!(engine.game.turn(), Player::Black);
    }

    #[test]
    fn moves_before_fen_are_reported() {
        let mut engine = Engine::default();
        let output = run(&mut engine, "position startpos moves e2e4 fen\nisready\n");
        assert!(output.starts_with("info string Invalid position"));
        assert!(output.ends_with("readyok\n"));
        assert_eq!(engine.game.turn(), Player::White);
    }

    #[test]
    fn illegal_move_stops_the_sequence() {
        let mut engine = Engine::default();
        let output = run(&mut engine, "position startpos moves e2e4 e2e4 d7d5\n");
        assert!(output.starts_with("info string Unexpected UCI move"));
        assert_eq!(engine.game.turn(), Player::Black);
    }

    #[test]
    fn setoption() {
        let mut engine = Engine::default();
        let _ = run(
            &mut engine,
            "setoption name Exploration value 0.5\nsetoption name RolloutDepth value 10\nsetoption name Seed value 7\n",
        );
        assert!((engine.config.exploration - 0.5).abs() < f64::EPSILON);
        assert_eq!(engine.config.rollout_depth, 10);
        assert_eq!(engine.config.seed, Some(7));
    }

    #[test]
    fn go_nodes() {
        let mut engine = seeded();
        let output = run(&mut engine, "position startpos\ngo nodes 200\n");
        assert!(output.contains("info nodes 200 "));
        let best_move = output
            .lines()
            .find_map(|line| line.strip_prefix("bestmove "))
            .unwrap();
        assert!(engine.game.parse_move(best_move).is_ok());
    }

    #[test]
    fn go_debug_lists_candidates() {
        let mut engine = seeded();
        let output = run(&mut engine, "debug on\ngo nodes 40\n");
        // Every root move gets tried once before any is revisited.
        assert_eq!(
            output
                .lines()
                .filter(|line| line.starts_with("info string"))
                .count(),
            20
        );
    }

    #[test]
    fn go_in_finished_game() {
        let mut engine = seeded();
        let output = run(
            &mut engine,
            "position startpos moves f2f3 e7e5 g2g4 d8h4\ngo movetime 10\n",
        );
        assert!(output.contains("info nodes 0 "));
        assert!(output.ends_with("bestmove 0000\n"));
    }

    #[test]
    fn budget_from_clock() {
        let mut engine = Engine::default();
        let white = engine.search_config(&Limits {
            wtime: Some(60_000),
            btime: Some(3_000),
            ..Limits::default()
        });
        assert_eq!(white.time, Duration::from_secs(2));

        let _ = run(&mut engine, "position startpos moves e2e4\n");
        let black = engine.search_config(&Limits {
            wtime: Some(60_000),
            btime: Some(3_000),
            ..Limits::default()
        });
        assert_eq!(black.time, Duration::from_millis(100));
    }

    #[test]
    fn budget_priorities() {
        let engine = Engine::default();
        let movetime = engine.search_config(&Limits {
            wtime: Some(60_000),
            movetime: Some(250),
            ..Limits::default()
        });
        assert_eq!(movetime.time, Duration::from_millis(250));

        let nodes = engine.search_config(&Limits {
            nodes: Some(1000),
            ..Limits::default()
        });
        assert_eq!(nodes.time, Duration::MAX);
        assert_eq!(nodes.iterations, Some(1000));

        let default = engine.search_config(&Limits::default());
        assert_eq!(default.time, Config::TIME);
        assert_eq!(default.iterations, None);
    }
}
