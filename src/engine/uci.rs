//! Parsing of the [UCI] commands the engine understands.
//!
//! [UCI]: https://www.chessprogramming.org/UCI

/// Limits of a single `go` command. Times are in milliseconds.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Limits {
    pub(super) wtime: Option<u64>,
    pub(super) btime: Option<u64>,
    pub(super) winc: Option<u64>,
    pub(super) binc: Option<u64>,
    pub(super) movestogo: Option<u32>,
    pub(super) nodes: Option<u64>,
    pub(super) movetime: Option<u64>,
    pub(super) infinite: bool,
}

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Uci,
    Debug { on: bool },
    IsReady,
    SetOption { option: EngineOption, value: OptionValue },
    SetPosition { fen: Option<String>, moves: Vec<String> },
    NewGame,
    Go(Limits),
    Stop,
    Quit,
    Bench,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EngineOption {
    Exploration,
    RolloutDepth,
    Seed,
}

#[derive(Debug, PartialEq)]
pub(super) enum OptionValue {
    Integer(u64),
    Float(f64),
}

fn parse_go(parts: &[&str]) -> Command {
    let mut limits = Limits::default();

    let mut i = 1;

    while i < parts.len() {
        let value = parts.get(i + 1);
        match parts[i] {
            "wtime" => limits.wtime = value.and_then(|v| v.parse().ok()),
            "btime" => limits.btime = value.and_then(|v| v.parse().ok()),
            "winc" => limits.winc = value.and_then(|v| v.parse().ok()),
            "binc" => limits.binc = value.and_then(|v| v.parse().ok()),
            "movestogo" => limits.movestogo = value.and_then(|v| v.parse().ok()),
            "nodes" => limits.nodes = value.and_then(|v| v.parse().ok()),
            "movetime" => limits.movetime = value.and_then(|v| v.parse().ok()),
            "infinite" => limits.infinite = true,
            _ => {},
        }
        if parts[i] == "infinite" {
            i += 1;
        } else {
            i += 2;
        }
    }

    Command::Go(limits)
}

fn parse_setoption(parts: &[&str]) -> Command {
    let unknown = || Command::Unknown(parts.join(" "));
    if parts.len() < 3 || parts[1] != "name" {
        return unknown();
    }
    let name_end = parts
        .iter()
        .position(|&x| x == "value")
        .unwrap_or(parts.len());
    let option = match parts[2..name_end].join(" ").as_str() {
        "Exploration" => EngineOption::Exploration,
        "RolloutDepth" => EngineOption::RolloutDepth,
        "Seed" => EngineOption::Seed,
        _ => return unknown(),
    };
    let Some(raw) = parts.get(name_end + 1) else {
        return unknown();
    };
    let value = match option {
        EngineOption::Exploration => raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(OptionValue::Float),
        EngineOption::RolloutDepth | EngineOption::Seed => {
            raw.parse::<u64>().ok().map(OptionValue::Integer)
        },
    };
    value.map_or_else(unknown, |value| Command::SetOption { option, value })
}

fn parse_setposition(parts: &[&str]) -> Command {
    let fen_index = parts.iter().position(|&x| x == "fen");
    // The move list can only follow the position.
    let moves_index = parts
        .iter()
        .position(|&x| x == "moves")
        .filter(|&moves_index| fen_index.map_or(true, |fen_index| moves_index > fen_index));
    let fen = fen_index.map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(" "));
    let moves = moves_index.map_or_else(Vec::new, |moves_index| {
        parts[moves_index + 1..]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    });
    Command::SetPosition { fen, moves }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return Self::Unknown(String::new());
        }

        match parts[0] {
            "uci" => Self::Uci,
            "debug" if parts.len() > 1 => Self::Debug {
                on: parts[1] == "on",
            },
            "isready" => Self::IsReady,
            "setoption" => parse_setoption(&parts),
            "position" => parse_setposition(&parts),
            "ucinewgame" => Self::NewGame,
            "go" => parse_go(&parts),
            "stop" => Self::Stop,
            "quit" => Self::Quit,
            "bench" => Self::Bench,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_uci() {
        assert_eq!(Command::parse("uci"), Command::Uci);
        assert_eq!(Command::parse("uci\n"), Command::Uci);
    }

    #[test]
    fn parse_debug() {
        assert_eq!(Command::parse("debug on"), Command::Debug { on: true });
        assert_eq!(Command::parse("debug off"), Command::Debug { on: false });
    }

    #[test]
    fn parse_isready() {
        assert_eq!(Command::parse("isready"), Command::IsReady);
    }

    #[test]
    fn parse_setoption() {
        assert_eq!(
            Command::parse("setoption name Exploration value 0.7"),
            Command::SetOption {
                option: EngineOption::Exploration,
                value: OptionValue::Float(0.7)
            }
        );
        assert_eq!(
            Command::parse("setoption name RolloutDepth value 20"),
            Command::SetOption {
                option: EngineOption::RolloutDepth,
                value: OptionValue::Integer(20)
            }
        );
        assert_eq!(
            Command::parse("setoption name Seed value 42"),
            Command::SetOption {
                option: EngineOption::Seed,
                value: OptionValue::Integer(42)
            }
        );
        assert_eq!(
            Command::parse("setoption name Exploration value -1"),
            Command::Unknown("setoption name Exploration value -1".to_string())
        );
        assert_eq!(
            Command::parse("setoption name Seed"),
            Command::Unknown("setoption name Seed".to_string())
        );
        assert_eq!(
            Command::parse("setoption name Hash value 128"),
            Command::Unknown("setoption name Hash value 128".to_string())
        );
    }

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position startpos"),
            Command::SetPosition {
                fen: None,
                moves: vec![]
            }
        );
        assert_eq!(
            Command::parse("position startpos moves e2e4 e7e5"),
            Command::SetPosition {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
        assert_eq!(
            Command::parse("position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4 e7e5"),
            Command::SetPosition {
                fen: Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()),
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
    }

    #[test]
    fn parse_position_out_of_order() {
        assert_eq!(
            Command::parse("position startpos moves e2e4 fen"),
            Command::SetPosition {
                fen: Some(String::new()),
                moves: vec![]
            }
        );
    }

    #[test]
    fn ucinewgame() {
        assert_eq!(Command::parse("ucinewgame"), Command::NewGame);
    }

    #[test]
    fn parse_go() {
        assert_eq!(
            Command::parse(
                "go wtime 300000 btime 300000 winc 10000 binc 10000 movestogo 40 nodes 500000 movetime 5000 infinite"
            ),
            Command::Go(Limits {
                wtime: Some(300_000),
                btime: Some(300_000),
                winc: Some(10000),
                binc: Some(10000),
                movestogo: Some(40),
                nodes: Some(500_000),
                movetime: Some(5000),
                infinite: true,
            })
        );

        assert_eq!(
            Command::parse("go movetime 100"),
            Command::Go(Limits {
                movetime: Some(100),
                ..Limits::default()
            })
        );

        assert_eq!(
            Command::parse("go wtime 1000"),
            Command::Go(Limits {
                wtime: Some(1000),
                ..Limits::default()
            })
        );

        assert_eq!(Command::parse("go"), Command::Go(Limits::default()));

        assert_eq!(
            Command::parse("go infinite"),
            Command::Go(Limits {
                infinite: true,
                ..Limits::default()
            })
        );
    }

    #[test]
    fn parse_stop() {
        assert_eq!(Command::parse("stop"), Command::Stop);
    }

    #[test]
    fn parse_quit() {
        assert_eq!(Command::parse("quit"), Command::Quit);
    }

    #[test]
    fn parse_bench() {
        assert_eq!(Command::parse("bench"), Command::Bench);
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("unknown command"),
            Command::Unknown("unknown command".to_string())
        );
    }
}
