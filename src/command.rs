//! Host-facing UCI command dispatch. See `spec.md` section 4.4: reads
//! standard input line by line and dispatches on the first
//! whitespace-separated token.

/// A parsed host command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Uci,
    IsReady,
    SetOption { name: String, value: Option<String> },
    Position { fen: Option<String>, moves: Vec<String> },
    NewGame,
    Go(GoArgs),
    Stop,
    Ponderhit,
    Quit,
    /// The verb wasn't recognised; carries the original line so the
    /// dispatcher can echo it back in the `info unknown command` reply.
    Unknown(String),
}

/// The arguments of a `go` command. `raw` is the full line, kept around
/// so a `go` the proxy decides not to interpret (no `wtime`, or agro
/// already active) can still be forwarded to the backend verbatim.
#[derive(Debug, PartialEq)]
pub struct GoArgs {
    pub wtime: Option<i64>,
    pub btime: Option<i64>,
    pub winc: Option<i64>,
    pub binc: Option<i64>,
    pub raw: String,
}

impl GoArgs {
    /// Whether this `go` carries a `wtime` time control at all.
    #[must_use]
    pub fn has_time_control(&self) -> bool {
        self.wtime.is_some()
    }
}

fn parse_go(parts: &[&str], raw: &str) -> Command {
    let mut wtime = None;
    let mut btime = None;
    let mut winc = None;
    let mut binc = None;

    let mut i = 1;
    while i + 1 < parts.len() {
        match parts[i] {
            "wtime" => wtime = parts[i + 1].parse().ok(),
            "btime" => btime = parts[i + 1].parse().ok(),
            "winc" => winc = parts[i + 1].parse().ok(),
            "binc" => binc = parts[i + 1].parse().ok(),
            _ => {},
        }
        i += 1;
    }

    Command::Go(GoArgs { wtime, btime, winc, binc, raw: raw.to_string() })
}

/// Generalises the source's single-word-key `setoption` parser (Open
/// Question (b) in `spec.md`): the literal `value` token is the
/// delimiter, so multi-word option names (`Move Overhead`) parse
/// correctly instead of being truncated at the first space.
fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 1 && parts[1] == "name" {
        let value_idx = parts.iter().position(|&x| x == "value");
        let name_end = value_idx.unwrap_or(parts.len());
        let name = parts[2..name_end].join(" ");
        let value = value_idx.map(|idx| parts[idx + 1..].join(" "));
        Command::SetOption { name, value }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_position(parts: &[&str]) -> Command {
    let fen_index = parts.iter().position(|&x| x == "fen");
    let moves_index = parts.iter().position(|&x| x == "moves");
    let fen = fen_index.map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(" "));
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(|s| (*s).to_string()).collect()
    });
    Command::Position { fen, moves }
}

impl Command {
    /// Parses one line of host input.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return Command::Unknown(input.to_string());
        }

        match parts[0] {
            "uci" => Command::Uci,
            "isready" => Command::IsReady,
            "setoption" => parse_setoption(&parts),
            "position" => parse_position(&parts),
            "ucinewgame" => Command::NewGame,
            "go" => parse_go(&parts, input),
            "stop" => Command::Stop,
            "ponderhit" => Command::Ponderhit,
            "quit" => Command::Quit,
            _ => Command::Unknown(input.to_string()),
        }
    }
}
