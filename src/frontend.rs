//! The UCI front-end: owns the game state and the backend adapter, and
//! implements the command dispatcher (`spec.md` section 4.4), position
//! handling (4.6), the `go` time-budgeting handler (4.7), the backend
//! output loop (4.10) and the bestmove selection policy (4.9) that sits on
//! top of it.
//!
//! A single [`Frontend`] instance is shared, via `Arc`, between the
//! host-command executor thread and the backend-output-consumer thread
//! described in `spec.md` section 5. Game state and the candidate snapshot
//! live behind one mutex (the "move-list mutex"); a second mutex keeps
//! multi-line stdout writes atomic.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::backend::Backend;
use crate::book::{Book, GambitBook};
use crate::chess::{Board, STARTPOS_FEN};
use crate::command::Command;
use crate::config;
use crate::game::{self, GameState};
use crate::info::InfoRecord;
use crate::options::{self, OptionName};
use crate::select;
use crate::time_manager::{self, TimeControl};

/// What the host-command executor should do after dispatching one line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The reduced key of the position reached by playing `uci_move` from
/// `board`, or `None` if the move doesn't apply cleanly. Goes through
/// [`game::reduced_key_of`], the single place that reduction is defined.
fn reduced_key_after(board: &Board, uci_move: &str) -> Option<String> {
    let mut board = board.clone();
    board.apply_uci_move(uci_move).ok()?;
    Some(game::reduced_key_of(&board.to_fen()))
}

/// Owns the game state and the backend adapter, and dispatches both host
/// commands and backend output against them.
pub struct Frontend {
    backend: Backend,
    game: Mutex<GameState>,
    book: Box<dyn Book + Send + Sync>,
    stdout_lock: Mutex<()>,
    /// Set the first time the backend's `uciok` is observed, gating the
    /// one-time startup option push described in `spec.md` section 4.4.
    backend_ready: AtomicBool,
}

impl Frontend {
    /// Wraps an already-spawned backend. The game starts at the standard
    /// starting position with no options set.
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            game: Mutex::new(GameState::new()),
            book: Box::new(GambitBook),
            stdout_lock: Mutex::new(()),
            backend_ready: AtomicBool::new(false),
        }
    }

    /// Writes one line to the host, holding the stdout mutex for the
    /// duration so it can never interleave with another write.
    fn write_line(&self, line: &str) {
        let _guard = self.stdout_lock.lock().unwrap();
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }

    /// Writes several lines as one atomic block.
    fn write_lines(&self, lines: &[String]) {
        let _guard = self.stdout_lock.lock().unwrap();
        let mut out = std::io::stdout().lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }

    /// Cancels the backend adapter. Called once the host-command loop
    /// ends, whether that's because of `quit` or because stdin closed.
    pub fn quit(&self) {
        self.backend.quit();
    }

    /// Dispatches one line of host input. Returns [`ControlFlow::Quit`]
    /// once `quit` has been handled, so the caller can stop reading stdin.
    pub fn handle_host_line(&self, line: &str) -> ControlFlow {
        match Command::parse(line) {
            Command::Uci => self.handle_uci(),
            Command::IsReady => self.backend.write("isready"),
            Command::SetOption { name, value } => self.handle_setoption(&name, value),
            Command::Position { fen, moves } => self.handle_position(fen, &moves, line),
            Command::NewGame => self.handle_newgame(),
            Command::Go(args) => self.handle_go(&args),
            Command::Stop => self.backend.write("stop"),
            Command::Ponderhit => self.backend.write("ponderhit"),
            Command::Quit => {
                self.backend.write("quit");
                self.backend.quit();
                return ControlFlow::Quit;
            },
            Command::Unknown(raw) => {
                let verb = raw.split_whitespace().next().unwrap_or(&raw);
                self.write_line(&format!("info unknown command '{verb}'"));
            },
        }
        ControlFlow::Continue
    }

    /// `uci`: announce identity and options, then forward `uci` to the
    /// backend so its own `uciok` is what ultimately reaches the host.
    fn handle_uci(&self) {
        self.write_line(&format!("id name {}", config::ENGINE_NAME));
        self.write_line(&format!("id author {}", config::ENGINE_AUTHOR));
        self.write_line("");
        for option in options::ADVERTISED_OPTIONS {
            self.write_line(&option.to_string());
        }
        self.backend.write("uci");
    }

    fn handle_setoption(&self, name: &str, value: Option<String>) {
        let Some(option) = OptionName::parse(name) else {
            self.write_line(&format!("info option '{name}' not found"));
            return;
        };
        let Some(value) = value else {
            self.write_line(&format!("info setoption '{name}' is missing a value"));
            return;
        };

        match option {
            OptionName::Threads => match value.parse::<u32>() {
                Ok(threads) => {
                    self.backend.write(&format!("setoption name Threads value {threads}"));
                    self.backend.write(&format!(
                        "setoption name Hash value {}",
                        threads * config::HASH_MIB_PER_THREAD
                    ));
                },
                Err(_) => self.write_line(&format!("info ERR invalid Threads value '{value}'")),
            },
            // The proxy controls MultiPV itself; accepted for UCI
            // compliance but otherwise ignored, per `spec.md` section 4.5.
            OptionName::MultiPv => {},
            OptionName::PlayBad => {
                self.game.lock().unwrap().play_bad = options::parse_bool(&value);
            },
            OptionName::StartAgro => {
                self.game.lock().unwrap().start_agro = options::parse_bool(&value);
            },
            OptionName::SyzygyPath => {
                self.backend.write(&format!("setoption name SyzygyPath value {value}"));
            },
            OptionName::Ponder => {
                self.backend.write(&format!("setoption name Ponder value {value}"));
            },
        }
    }

    /// `position [startpos|fen ...] [moves ...]`: replays the moves on a
    /// [`Board`] to recover the true current FEN, active color, and
    /// full-move number, then forwards the verbatim command to the
    /// backend so it has its own authoritative picture (`spec.md` section
    /// 4.6).
    fn handle_position(&self, fen: Option<String>, moves: &[String], raw_line: &str) {
        let base_fen = fen.unwrap_or_else(|| STARTPOS_FEN.to_string());
        let replayed = Board::from_fen(&base_fen)
            .and_then(|mut board| board.apply_moves(moves.iter().map(String::as_str)).map(|()| board));

        match replayed {
            Ok(board) => {
                let fen = board.to_fen();
                let side_to_move = board.side_to_move();
                let fullmove_number = board.fullmove_number();
                {
                    let mut game = self.game.lock().unwrap();
                    game.fen = fen.clone();
                    game.side_to_move = side_to_move;
                    game.fullmove_number = fullmove_number;
                }
                self.backend.write(raw_line);
                self.write_line(&format!(
                    "info fen set to '{fen}' move {fullmove_number}, {side_to_move} to play"
                ));
            },
            Err(err) => {
                let err = crate::error::ProxyError::MalformedFen(err);
                self.write_line(&format!("info ERR {err}"));
            },
        }
    }

    /// `ucinewgame`: resets game state and pushes the resulting MultiPV
    /// width, per `spec.md` section 4.4.
    fn handle_newgame(&self) {
        let multipv = {
            let mut game = self.game.lock().unwrap();
            game.reset_for_new_game();
            game.multipv
        };
        self.backend.write("ucinewgame");
        self.backend.write(&format!("setoption name MultiPV value {multipv}"));
    }

    /// `go [wtime ... winc ... btime ... binc ...]`: opening-book short
    /// circuits, otherwise a time-budgeted (or verbatim) `go` reaches the
    /// backend. See `spec.md` section 4.7.
    fn handle_go(&self, args: &crate::command::GoArgs) {
        let (fen, agro, side_to_move, fullmove_number, eval_cp, mate_in) = {
            let game = self.game.lock().unwrap();
            (
                game.fen.clone(),
                game.agro,
                game.side_to_move,
                game.fullmove_number,
                game.eval_cp,
                game.mate_in,
            )
        };

        // `GambitBook::book_move` already covers the startpos case (it
        // falls through to the random first-move table whenever the FEN
        // matches `STARTPOS_FEN`, independent of `agro`), so one lookup
        // handles both halves of `spec.md` section 4.7's opening step.
        if let Some(book_move) = self.book.book_move(&fen, agro) {
            self.write_line(&format!("bestmove {book_move}"));
            return;
        }

        if !args.has_time_control() || agro {
            self.backend.write(&args.raw);
            return;
        }

        let control = TimeControl {
            wtime: args.wtime.unwrap_or(0),
            winc: args.winc.unwrap_or(0),
            btime: args.btime.unwrap_or(0),
            binc: args.binc.unwrap_or(0),
        };
        let budget = time_manager::compute_movetime(side_to_move, &control, fullmove_number, eval_cp, mate_in);

        if budget.agro_triggered {
            let mut game = self.game.lock().unwrap();
            game.agro = true;
            if game.multipv != config::AGRO_MULTIPV {
                game.multipv = config::AGRO_MULTIPV;
                drop(game);
                self.backend.write(&format!("setoption name MultiPV value {}", config::AGRO_MULTIPV));
            }
        }

        self.backend.write(&format!("go movetime {}", budget.movetime_ms));
    }

    /// Dispatches one backend stdout line (`spec.md` section 4.10).
    pub fn handle_backend_line(&self, line: &str) {
        match line.split_whitespace().next() {
            Some("readyok") => self.write_line("readyok"),
            Some("uciok") => {
                if !self.backend_ready.swap(true, Ordering::SeqCst) {
                    self.push_startup_options();
                }
                self.write_line("uciok");
            },
            Some("info") => self.handle_backend_info(line),
            Some("bestmove") => self.handle_bestmove(line),
            _ => crate::logging::log_debug_line(&format!("backend: ignored '{line}'")),
        }
    }

    /// Pushed once, right after the backend's first `uciok`, per
    /// `spec.md` section 4.4.
    fn push_startup_options(&self) {
        let multipv = self.game.lock().unwrap().multipv;
        self.backend.write(&format!("setoption name Threads value {}", config::DEFAULT_THREADS));
        self.backend.write(&format!(
            "setoption name Hash value {}",
            config::DEFAULT_THREADS * config::HASH_MIB_PER_THREAD
        ));
        self.backend.write(&format!("setoption name MultiPV value {multipv}"));
        self.backend.write(&format!("setoption name Move Overhead value {}", config::MOVE_OVERHEAD_MS));
    }

    fn handle_backend_info(&self, line: &str) {
        let Some(record) = crate::info::parse_info_line(line) else {
            return;
        };
        let flushed = self.game.lock().unwrap().snapshot.push(record);
        if let Some(records) = flushed {
            self.forward_snapshot(&records);
        }
    }

    fn forward_snapshot(&self, records: &[InfoRecord]) {
        let lines: Vec<String> = records.iter().map(|record| record.raw.clone()).collect();
        self.write_lines(&lines);
    }

    /// `bestmove ...` from the backend: runs the selection policy, flushes
    /// the in-flight snapshot, applies the optional repetition-avoidance
    /// nudge, and emits the proxy's own `bestmove` to the host. See
    /// `spec.md` section 4.9.
    fn handle_bestmove(&self, line: &str) {
        if line.trim() == "bestmove (none)" {
            self.write_line(line);
            return;
        }

        let Some(rest) = line.strip_prefix("bestmove ") else {
            self.write_line(line);
            return;
        };
        let (move_part, ponder_suffix) = match rest.find(" ponder ") {
            Some(idx) => (&rest[..idx], Some(rest[idx..].to_string())),
            None => (rest, None),
        };

        let (uci_move, eval_str, agro, to_flush) = {
            let mut game = self.game.lock().unwrap();
            let records = game.snapshot.records().to_vec();
            let selection = select::select(&records, move_part, game.eval_cp, game.agro, game.play_bad);
            if selection.agro {
                game.agro = true;
            }

            let to_flush = game.snapshot.flush_if_unflushed();

            let mut chosen = selection.record.clone();
            let board = Board::from_fen(&game.fen).ok();
            if let Some(board) = &board {
                let candidate = select::first_move(&chosen.pv).to_string();
                if let Some(key) = reduced_key_after(board, &candidate) {
                    let seen_before = game.repetitions.get(&key).copied().unwrap_or(0) > 0;
                    if seen_before {
                        if let Some(alt) = records
                            .iter()
                            .take(2)
                            .find(|r| r.score_cp >= -30 && select::first_move(&r.pv) != candidate)
                        {
                            chosen = alt.clone();
                        }
                    }
                }
            }

            let uci_move = select::first_move(&chosen.pv).to_string();
            if let Some(board) = &board {
                if let Some(key) = reduced_key_after(board, &uci_move) {
                    game.record_key(key);
                }
            }

            game.mate_in = chosen.mate;
            game.eval_cp = chosen.score_cp;
            game.snapshot.reset();

            let eval_str = select::format_eval(game.side_to_move, chosen.score_cp, chosen.mate);
            (uci_move, eval_str, selection.agro, to_flush)
        };

        if let Some(records) = to_flush {
            self.forward_snapshot(&records);
        }

        let mut out = format!("bestmove {uci_move} eval {eval_str} agro {agro}");
        if let Some(ponder) = ponder_suffix {
            out.push_str(&ponder);
        }
        self.write_line(&out);
    }
}
