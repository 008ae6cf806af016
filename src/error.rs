//! The one place a caller needs to match on a specific failure kind
//! rather than just propagate it with `anyhow`. Everything else in this
//! crate returns `anyhow::Result`.

use thiserror::Error;

/// Failures the proxy's control loops react to differently depending on
/// which variant they see.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The backend's stdout closed (the child process exited or its pipe
    /// broke). The output consumer stops and the whole proxy shuts down.
    #[error("backend process exited")]
    BackendExited,

    /// A `position fen ...` command carried a FEN that didn't parse.
    #[error("malformed FEN: {0}")]
    MalformedFen(#[source] anyhow::Error),
}
