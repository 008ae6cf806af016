//! The single mutable game-state instance the UCI front-end owns, plus
//! the optional position-repetition map. See `spec.md` section 3; guarded
//! in the running proxy by the "move-list mutex" described in section 5.

use std::collections::HashMap;

use crate::chess::{Color, STARTPOS_FEN};
use crate::config::{AGRO_MULTIPV, EQUALITY_MULTIPV};
use crate::info::SnapshotBuffer;

/// The piece-placement + side-to-move reduction of a FEN, used as the
/// repetition-map key (`spec.md` section 3). The single source of truth for
/// this reduction; [`GameState::reduced_key`] and the bestmove handler's
/// lookahead both go through this.
#[must_use]
pub fn reduced_key_of(fen: &str) -> String {
    fen.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

/// Mutable, single-instance-per-process game state.
pub struct GameState {
    pub fen: String,
    pub side_to_move: Color,
    pub fullmove_number: u32,
    /// Centipawns, from the side-to-move's viewpoint, as reported by the
    /// backend.
    pub eval_cp: i64,
    /// 0 means "no mate known".
    pub mate_in: i64,
    /// Sticky for the rest of the game once set.
    pub agro: bool,
    /// Host-configured: new games start with `agro` already set.
    pub start_agro: bool,
    /// Host-configured: in equality mode, deliberately pick a losing
    /// line if one exists.
    pub play_bad: bool,
    pub multipv: u32,
    pub snapshot: SnapshotBuffer,
    /// Reduced-FEN (piece placement + side to move) seen-counts, written
    /// on every move the proxy plays.
    pub repetitions: HashMap<String, u32>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            fen: STARTPOS_FEN.to_string(),
            side_to_move: Color::White,
            fullmove_number: 1,
            eval_cp: 0,
            mate_in: 0,
            agro: false,
            start_agro: false,
            play_bad: false,
            multipv: EQUALITY_MULTIPV,
            snapshot: SnapshotBuffer::new(),
            repetitions: HashMap::new(),
        }
    }
}

impl GameState {
    /// A fresh game at the standard starting position, no options set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `ucinewgame`: resets position and search state but keeps the
    /// host-configured `start_agro`/`play_bad` options, which persist
    /// across games until the host changes them.
    pub fn reset_for_new_game(&mut self) {
        self.fen = STARTPOS_FEN.to_string();
        self.side_to_move = Color::White;
        self.fullmove_number = 1;
        self.agro = self.start_agro;
        self.mate_in = 0;
        self.eval_cp = 0;
        self.multipv = if self.start_agro { AGRO_MULTIPV } else { EQUALITY_MULTIPV };
        self.snapshot.reset();
        self.repetitions.clear();
    }

    /// The piece-placement + side-to-move prefix of the current FEN, used
    /// as the repetition-map key.
    #[must_use]
    pub fn reduced_key(&self) -> String {
        reduced_key_of(&self.fen)
    }

    /// Records that the current position was just reached, returning how
    /// many times (including this one) it's now been seen.
    pub fn record_repetition(&mut self) -> u32 {
        let key = self.reduced_key();
        self.record_key(key)
    }

    /// Records that `key` (a reduced FEN) was just reached, returning how
    /// many times (including this one) it's now been seen. Used by the
    /// bestmove handler, which records the position the proxy's own move
    /// reaches rather than the position it moved from.
    pub fn record_key(&mut self, key: String) -> u32 {
        let count = self.repetitions.entry(key).or_insert(0);
        *count += 1;
        *count
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reset_honors_start_agro() {
        let mut game = GameState::new();
        game.start_agro = true;
        game.agro = true;
        game.eval_cp = 500;
        game.reset_for_new_game();
        assert!(game.agro);
        assert_eq!(game.multipv, AGRO_MULTIPV);
        assert_eq!(game.eval_cp, 0);
        assert_eq!(game.fen, STARTPOS_FEN);
    }

    #[test]
    fn reduced_key_drops_trailing_fields() {
        let mut game = GameState::new();
        game.fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string();
        assert_eq!(
            game.reduced_key(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
        );
    }

    #[test]
    fn repetition_counts_accumulate() {
        let mut game = GameState::new();
        assert_eq!(game.record_repetition(), 1);
        assert_eq!(game.record_repetition(), 2);
    }
}
