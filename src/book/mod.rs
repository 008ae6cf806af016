//! The curated opening book: a weighted choice of first moves for the
//! starting position, and a small set of hand-picked gambit/trap lines
//! consulted by FEN prefix. See `spec.md` section 4.2.

use once_cell::sync::Lazy;
use rand::Rng;

use crate::chess::STARTPOS_FEN;

/// A first-move candidate and its relative weight. Weight 0 entries are
/// kept for documentation (they're real openings, just bad ones) and are
/// never selected.
struct FirstMove {
    uci: &'static str,
    weight: u32,
}

/// Exact weights from the engine this book was tuned against (depth
/// 35-50 Stockfish evaluations of the starting position).
const FIRST_MOVES: &[FirstMove] = &[
    FirstMove { uci: "e2e4", weight: 29 },
    FirstMove { uci: "d2d4", weight: 26 },
    FirstMove { uci: "g1f3", weight: 26 },
    FirstMove { uci: "c2c4", weight: 14 },
    FirstMove { uci: "g2g3", weight: 14 },
    FirstMove { uci: "e2e3", weight: 6 },
    FirstMove { uci: "b2b3", weight: 6 },
    FirstMove { uci: "a2a3", weight: 1 },
    FirstMove { uci: "c2c3", weight: 1 },
    FirstMove { uci: "d2d3", weight: 1 },
    FirstMove { uci: "h2h3", weight: 1 },
    FirstMove { uci: "b1c3", weight: 1 },
    FirstMove { uci: "a2a4", weight: 1 },
    // Objectively weak, but Komodo beat Stockfish with it once; kept as
    // a rare surprise rather than a serious choice.
    FirstMove { uci: "f2f4", weight: 3 },
    FirstMove { uci: "b2b4", weight: 0 },
    FirstMove { uci: "h2h4", weight: 0 },
    FirstMove { uci: "b1a3", weight: 0 },
    FirstMove { uci: "g1h3", weight: 0 },
    FirstMove { uci: "f2f3", weight: 0 },
    FirstMove { uci: "g2g4", weight: 0 },
];

/// Flattened choice list: each move appears `weight` times, mirroring the
/// source table's `rand.Intn(len(choices))` selection instead of a
/// cumulative-weight walk.
static FIRST_MOVE_CHOICES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    FIRST_MOVES
        .iter()
        .filter(|m| m.weight > 0)
        .flat_map(|m| std::iter::repeat(m.uci).take(m.weight as usize))
        .collect()
});

/// One entry in the casual book: a FEN prefix to match against and the
/// reply to play if it matches. Checked in registration order; the first
/// match wins.
struct CasualBookEntry {
    fen_prefix: &'static str,
    reply: &'static str,
}

/// Wayward Queen, Englund Gambit, Smith-Morra Gambit, Reverse Morra, and a
/// d4/Nf3 English-flavored line, in the order they were written.
const CASUAL_BOOK: &[CasualBookEntry] = &[
    // Wayward Queen: 1. e4 e5 2. Qh5
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w",
        reply: "d1h5",
    },
    // Englund Gambit
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b",
        reply: "e7e5",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w",
        reply: "d4e5",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppp1ppp/8/4P3/8/8/PPP1PPPP/RNBQKBNR b",
        reply: "b8c6",
    },
    CasualBookEntry {
        fen_prefix: "r1bqkbnr/pppp1ppp/2n5/4P3/8/8/PPP1PPPP/RNBQKBNR w",
        reply: "g1f3",
    },
    CasualBookEntry {
        fen_prefix: "r1bqkbnr/pppp1ppp/2n5/4P3/8/5N2/PPP1PPPP/RNBQKB1R b",
        reply: "d8e7",
    },
    CasualBookEntry {
        fen_prefix: "r1bqkbnr/pppp1ppp/2n5/4P3/5B2/8/PPP1PPPP/RN1QKBNR b",
        reply: "d8e7",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/ppppqppp/2n5/4P3/8/5N2/PPP1PPPP/RNBQKB1R w",
        reply: "c1g5",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/ppppqppp/2n5/4P1B1/8/5N2/PPP1PPPP/RN1QKB1R b",
        reply: "e7b4",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/ppppqppp/2n5/4P3/5B2/5N2/PPP1PPPP/RN1QKB1R b",
        reply: "e7b4",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/pppp1ppp/2n5/4P1B1/1q6/2N2N2/PPP1PPPP/R2QKB1R b",
        reply: "b4b2",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/pppp1ppp/2n5/4P3/8/2N2N2/PqPBPPPP/R2QKB1R b",
        reply: "f8b4",
    },
    CasualBookEntry {
        fen_prefix: "r1b1kbnr/pppp1ppp/2n5/4P3/1q6/5N2/PPPBPPPP/RN1QKB1R b",
        reply: "b4b2",
    },
    // Smith-Morra Gambit
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b",
        reply: "c7c5",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w",
        reply: "d2d4",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp1ppppp/8/2p5/3PP3/8/PPP2PPP/RNBQKBNR b",
        reply: "c5d4",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp1ppppp/8/8/3pP3/8/PPP2PPP/RNBQKBNR w",
        reply: "c2c3",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp1ppppp/8/8/3pP3/2P5/PP3PPP/RNBQKBNR b",
        reply: "d4c3",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp1ppppp/8/8/4P3/2p5/PP3PPP/RNBQKBNR w",
        reply: "b1c3",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp2pppp/3p4/8/4P3/2N5/PP3PPP/R1BQKBNR w KQkq -",
        reply: "f1c4",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp2pppp/3p4/8/2B1P3/2N5/PP3PPP/R1BQK1NR b KQkq -",
        reply: "b8c6",
    },
    // Reverse Morra
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR b KQkq -",
        reply: "d2d4",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/ppp1pppp/8/3p4/2P5/8/PP1PPPPP/RNBQKBNR w KQkq -",
        reply: "c4d5",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/ppp1pppp/8/3P4/8/8/PP1PPPPP/RNBQKBNR b KQkq -",
        reply: "c7c6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp2pppp/2p5/3P4/8/8/PP1PPPPP/RNBQKBNR w KQkq -",
        reply: "d5c6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pp2pppp/2P5/8/8/8/PP1PPPPP/RNBQKBNR b KQkq -",
        reply: "b8c6",
    },
    CasualBookEntry {
        fen_prefix: "r1bqkbnr/pp2pppp/2n5/8/8/2N5/PP1PPPPP/R1BQKBNR b KQkq -",
        reply: "a7a6",
    },
    // d4/Nf3 English-flavored line
    CasualBookEntry {
        fen_prefix: "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b",
        reply: "g8f6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR w",
        reply: "c2c4",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/pppppppp/5n2/8/2PP4/8/PP2PPPP/RNBQKBNR b",
        reply: "e7e6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/pppppppp/5n2/8/3P4/5N2/PPP1PPPP/RNBQKB1R b",
        reply: "e7e6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/8/PP2PPPP/RNBQKBNR w",
        reply: "g2g3",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/5N2/PP2PPPP/RNBQKB1R b",
        reply: "b7b6",
    },
    CasualBookEntry {
        fen_prefix: "rnbqk2r/p1pp1ppp/1p2pn2/8/1bPP4/5NP1/PP2PP1P/RNBQKB1R w",
        reply: "c1d2",
    },
    CasualBookEntry {
        fen_prefix: "rnbqk2r/p1pp1ppp/1p2pn2/8/1bPP4/5NP1/PP1BPP1P/RN1QKB1R b",
        reply: "b4e7",
    },
    CasualBookEntry {
        fen_prefix: "rnbqkb1r/p1pp1ppp/1p2pn2/8/2PP4/5NP1/PP2PP1P/RNBQKB1R b",
        reply: "c8a6",
    },
    CasualBookEntry {
        fen_prefix: "rn1qkb1r/p1pp1ppp/bp2pn2/8/2PP4/1P3NP1/P3PP1P/RNBQKB1R b",
        reply: "d7d5",
    },
    CasualBookEntry {
        fen_prefix: "rn1qkb1r/p1p2ppp/bp2pn2/3p4/2PP4/1P3NP1/P3PPBP/RNBQK2R b",
        reply: "b8d7",
    },
];

/// Supplies book moves for a position. Implemented by [`GambitBook`]; kept
/// as a trait so the selection policy doesn't depend on the concrete
/// table layout.
pub trait Book {
    /// Returns a book reply for `fen`, or `None` if the position isn't in
    /// book. When `agro` is set the casual (gambit/trap) lines are
    /// skipped entirely, per `spec.md` section 4.2.
    fn book_move(&self, fen: &str, agro: bool) -> Option<String>;
}

/// The book described in `spec.md` section 4.2: a weighted first-move
/// table plus a curated set of casual-mode trap lines.
#[derive(Default)]
pub struct GambitBook;

impl GambitBook {
    /// Looks up the casual-mode reply for `fen`, if any, independent of
    /// the `agro` flag.
    #[must_use]
    pub fn casual_book_move(&self, fen: &str) -> Option<String> {
        CASUAL_BOOK
            .iter()
            .find(|entry| fen.starts_with(entry.fen_prefix))
            .map(|entry| entry.reply.to_string())
    }

    /// Samples a first move from the weighted table, proportionally to
    /// weight.
    #[must_use]
    pub fn random_first_move(&self) -> String {
        let choices = &*FIRST_MOVE_CHOICES;
        let index = rand::thread_rng().gen_range(0..choices.len());
        choices[index].to_string()
    }
}

impl Book for GambitBook {
    fn book_move(&self, fen: &str, agro: bool) -> Option<String> {
        if !agro {
            if let Some(reply) = self.casual_book_move(fen) {
                return Some(reply);
            }
        }

        if fen.starts_with(STARTPOS_FEN) {
            return Some(self.random_first_move());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn casual_book_finds_wayward_queen() {
        let book = GambitBook;
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(book.casual_book_move(fen), Some("d1h5".to_string()));
    }

    #[test]
    fn casual_book_misses_unknown_position() {
        let book = GambitBook;
        let fen = "8/8/8/8/8/8/8/K6k w - - 0 50";
        assert_eq!(book.casual_book_move(fen), None);
    }

    /// `spec.md` section 8's book-lookup property is over the whole
    /// table, not one hand-picked entry: setting each registered prefix as
    /// the current FEN must return its registered reply. A few prefixes in
    /// `CASUAL_BOOK` repeat verbatim (carried over from
    /// `original_source`'s own first-match-wins duplication), so the
    /// expected reply per prefix is the first one registered, exactly the
    /// semantics `casual_book_move`'s `find` implements.
    #[test]
    fn casual_book_covers_every_registered_prefix() {
        let book = GambitBook;
        let mut first_reply_for_prefix: std::collections::HashMap<&str, &str> =
            std::collections::HashMap::new();
        for entry in CASUAL_BOOK {
            first_reply_for_prefix.entry(entry.fen_prefix).or_insert(entry.reply);
        }

        for (prefix, expected_reply) in &first_reply_for_prefix {
            assert_eq!(
                book.casual_book_move(prefix),
                Some((*expected_reply).to_string()),
                "prefix '{prefix}' did not resolve to its registered reply"
            );
        }
    }

    #[test]
    fn agro_mode_skips_casual_book() {
        let book = GambitBook;
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(book.book_move(fen, true), None);
    }

    #[test]
    fn starting_position_always_produces_a_first_move() {
        let book = GambitBook;
        for _ in 0..50 {
            let mv = book.book_move(STARTPOS_FEN, true).unwrap();
            assert!(FIRST_MOVES.iter().any(|m| m.uci == mv && m.weight > 0));
        }
    }

    #[test]
    fn zero_weight_moves_are_never_chosen() {
        let book = GambitBook;
        for _ in 0..200 {
            let mv = book.random_first_move();
            assert_ne!(mv, "b2b4");
            assert_ne!(mv, "g2g4");
        }
    }
}
