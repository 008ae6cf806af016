//! Two independent logging channels. `tracing` carries interactive
//! diagnostics to stderr; a plain append-only file carries backend
//! stderr lines and adapter timing notes, since those need to survive
//! past the lifetime of a single terminal.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::config::DEBUG_LOG_PATH;

static DEBUG_LOG: OnceCell<Mutex<BufWriter<File>>> = OnceCell::new();

/// Initialises the `tracing` subscriber. Call once, from `main`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn debug_log() -> &'static Mutex<BufWriter<File>> {
    DEBUG_LOG.get_or_init(|| {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG_PATH)
            .expect("failed to open debug log");
        Mutex::new(BufWriter::new(file))
    })
}

/// Appends one line to the debug log file, flushing immediately so a
/// crashed backend's last words aren't lost in a buffer.
pub fn log_debug_line(line: &str) {
    let mut writer = debug_log().lock().unwrap();
    let _ = writeln!(writer, "{line}");
    let _ = writer.flush();
}
