//! Minimal chess position tracking: enough to parse a FEN, replay
//! long-algebraic moves, and render the result. No legal-move generation.

/// `Board` and FEN/move-application logic.
pub mod board;
/// The small chess primitives (`Square`, `Color`, `Piece`, ...).
pub mod core;

pub use board::{Board, UciMove, STARTPOS_FEN};
pub use core::{CastleRights, Color, File, Piece, PieceKind, Rank, Square};
