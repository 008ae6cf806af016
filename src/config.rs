//! Compiled-in configuration. The backend path and the engine's
//! self-announced identity have no required environment variables or
//! config file per `spec.md` section 6 — they're constants.

/// Path to the backend UCI engine executable.
pub const BACKEND_PATH: &str = "/usr/local/bin/backend-engine";

/// Name this proxy announces to the host in response to `uci`.
pub const ENGINE_NAME: &str = "gambitproxy";

/// Author string announced to the host in response to `uci`.
pub const ENGINE_AUTHOR: &str = "the trollfish developers";

/// Path to the append-only debug log (backend stderr, adapter timing
/// notes).
pub const DEBUG_LOG_PATH: &str = "gambitproxy.debug.log";

/// Default thread count pushed to the backend at startup.
pub const DEFAULT_THREADS: u32 = 1;

/// Hash table size (MiB) per thread, pushed to the backend as
/// `Hash = Threads * HASH_MIB_PER_THREAD`.
pub const HASH_MIB_PER_THREAD: u32 = 128;

/// `Move Overhead` pushed to the backend at startup, milliseconds.
pub const MOVE_OVERHEAD_MS: u32 = 30;

/// MultiPV width used outside agro mode.
pub const EQUALITY_MULTIPV: u32 = 4;

/// MultiPV width used once agro is active.
pub const AGRO_MULTIPV: u32 = 1;

/// Capacity of the bounded line channels (stdin, backend stdout/stderr).
pub const CHANNEL_CAPACITY: usize = 512;

/// Latency margin subtracted from the clock before budgeting a move, per
/// `spec.md` section 4.7.
pub const LATENCY_MARGIN_MS: i64 = 500;
