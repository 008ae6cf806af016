//! A UCI proxy that sits between a chess GUI/relay (the host) and a strong
//! backend engine, reshaping the backend's move selection to pursue
//! gambits, equality, and time-pressure opportunism instead of the
//! objectively best move. See `spec.md` for the full design.

/// Spawning and talking to the backend engine's child process.
pub mod backend;
/// The curated opening book (weighted first moves, casual/gambit replies).
pub mod book;
/// Board representation, FEN, and long-algebraic move application.
pub mod chess;
/// Parsing one line of host input into a [`command::Command`].
pub mod command;
/// Compiled-in constants (paths, names, tuning values).
pub mod config;
/// The typed errors calling code branches on; everything else is `anyhow`.
pub mod error;
/// The command dispatcher and bestmove selection wiring.
pub mod frontend;
/// The single mutable per-process game state.
pub mod game;
/// Parsing backend `info` lines and grouping them into candidate snapshots.
pub mod info;
/// Tracing setup and the backend-stderr debug log.
pub mod logging;
/// Recognised `setoption` knobs and the advertised option list.
pub mod options;
/// The agro/equality/play-bad bestmove selection policy.
pub mod select;
/// Phase- and clock-based `movetime` budgeting.
pub mod time_manager;

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use frontend::{ControlFlow, Frontend};

/// Spawns the backend, starts the stdin reader and backend-output-consumer
/// threads, and drains host commands on the calling thread until `quit` is
/// received or stdin closes. This is the concurrency model of `spec.md`
/// section 5: three actors cooperating around one shared, mutex-guarded
/// game state.
pub fn run() -> anyhow::Result<()> {
    let backend = backend::Backend::spawn(config::BACKEND_PATH)?;
    let backend_output = backend.output().clone();
    let frontend = Arc::new(Frontend::new(backend));

    let (stdin_tx, stdin_rx) = crossbeam_channel::bounded::<String>(config::CHANNEL_CAPACITY);
    let stdin_thread = thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if stdin_tx.send(line).is_err() {
                        break;
                    }
                },
                Err(_) => break,
            }
        }
    });

    let output_thread = {
        let frontend = Arc::clone(&frontend);
        thread::spawn(move || {
            for line in &backend_output {
                frontend.handle_backend_line(&line);
            }
            // The backend's stdout closed: the child exited or its pipe
            // broke. `spec.md` section 7 requires this to terminate the
            // whole proxy. The main thread's stdin loop is blocked on a
            // real OS read with no way to interrupt it from here, so we
            // cancel the backend side and then exit the process outright
            // rather than leave it hung waiting on a host that will never
            // send another line.
            tracing::warn!(error = %error::ProxyError::BackendExited, "backend output loop exiting");
            frontend.quit();
            std::process::exit(0);
        })
    };

    for line in &stdin_rx {
        if frontend.handle_host_line(&line) == ControlFlow::Quit {
            break;
        }
    }
    frontend.quit();

    let _ = stdin_thread.join();
    let _ = output_thread.join();
    Ok(())
}
