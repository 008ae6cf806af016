//! Owns the backend engine as a child process: a write side (one UCI
//! command per line) and a bounded receive side (stdout lines). See
//! `spec.md` section 4.3.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Context;
use crossbeam_channel::Receiver;

use crate::config::CHANNEL_CAPACITY;
use crate::logging::log_debug_line;

/// The backend engine child process and its line-oriented I/O.
///
/// Only this type may write to the child's stdin; only its own stdout
/// reader thread may read the child's stdout, per `spec.md` section 5's
/// ownership rule.
pub struct Backend {
    child: Mutex<Child>,
    stdin: Mutex<ChildStdin>,
    stdout_rx: Receiver<String>,
    shutdown: Arc<AtomicBool>,
}

impl Backend {
    /// Spawns the backend executable at `path`, inheriting no extra
    /// environment, and starts its stdout/stderr reader threads.
    pub fn spawn(path: &str) -> anyhow::Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning backend engine at '{path}'"))?;

        let stdin = child.stdin.take().context("backend stdin was not piped")?;
        let stdout = child.stdout.take().context("backend stdout was not piped")?;
        let stderr = child.stderr.take().context("backend stderr was not piped")?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);

        let stdout_shutdown = Arc::clone(&shutdown);
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                if stdout_shutdown.load(Ordering::Relaxed) {
                    break;
                }
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    },
                    Err(_) => break,
                }
            }
        });

        thread::spawn(move || {
            let reader = BufReader::new(stderr);
            for line in reader.lines().map_while(Result::ok) {
                log_debug_line(&format!("backend stderr: {line}"));
            }
        });

        Ok(Self { child: Mutex::new(child), stdin: Mutex::new(stdin), stdout_rx: rx, shutdown })
    }

    /// Appends a newline and writes `line` to the child's stdin. Failures
    /// are swallowed; the child's exit is detected separately through the
    /// stdout channel closing.
    pub fn write(&self, line: &str) {
        let mut stdin = self.stdin.lock().unwrap();
        let _ = writeln!(stdin, "{line}");
        let _ = stdin.flush();
    }

    /// The bounded channel of backend stdout lines. Receiving ends when
    /// the child exits (the sender is dropped) or [`Backend::quit`] has
    /// fired.
    #[must_use]
    pub fn output(&self) -> &Receiver<String> {
        &self.stdout_rx
    }

    /// Cancels the adapter: stops the stdout reader from forwarding
    /// further lines and terminates the child process.
    pub fn quit(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.write("quit");
        let _ = self.child.lock().unwrap().kill();
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.child.lock().unwrap().kill();
    }
}
