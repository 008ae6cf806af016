//! A minimal chess position: just enough state to parse a FEN, apply a
//! sequence of long-algebraic ("UCI") moves to it, and render the result
//! back out. No legal-move generation lives here — the proxy only ever
//! needs to replay moves the host already validated, per `spec.md` section
//! 4.1.

use std::fmt;

use anyhow::{Context, bail};

use super::core::{CastleRights, Color, Piece, PieceKind, Square};

/// A parsed long-algebraic move: origin square, destination square, and an
/// optional promotion piece. Legality is never checked; interpretation is
/// purely geometric.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl UciMove {
    /// Parses a 4- or 5-character UCI move such as `e2e4` or `e7e8q`.
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        if s.len() != 4 && s.len() != 5 {
            bail!("malformed move '{s}': expected 4 or 5 characters");
        }
        let from = Square::try_from(&s[0..2]).with_context(|| format!("parsing move '{s}'"))?;
        let to = Square::try_from(&s[2..4]).with_context(|| format!("parsing move '{s}'"))?;
        let promotion = match s.len() {
            5 => Some(PieceKind::from_promotion_letter(
                s.as_bytes()[4] as char,
            )?),
            _ => None,
        };
        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.symbol().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// A chess position: 64-square array, side to move, castling rights,
/// en-passant target, half-move clock, full-move number. See `spec.md`
/// section 3.
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

/// FEN of the standard starting position.
pub const STARTPOS_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        Self::from_fen(STARTPOS_FEN).expect("starting position FEN is well-formed")
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Parses a FEN into a [`Board`]. Splits on spaces into exactly six
    /// tokens; the first is split on `/` into eight ranks processed from
    /// rank 8 down to rank 1.
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let tokens: Vec<&str> = fen.split(' ').collect();
        if tokens.len() != 6 {
            bail!("malformed FEN '{fen}': expected 6 space-separated fields, got {}", tokens.len());
        }
        let mut squares: [Option<Piece>; 64] = [None; 64];
        let ranks: Vec<&str> = tokens[0].split('/').collect();
        if ranks.len() != 8 {
            bail!("malformed FEN '{fen}': expected 8 ranks, got {}", ranks.len());
        }
        for (rank_from_top, rank_fen) in ranks.iter().enumerate() {
            let rank_index = 7 - rank_from_top as u8;
            let mut file: u8 = 0;
            for c in rank_fen.chars() {
                if c.is_ascii_digit() {
                    let n = c as u8 - b'0';
                    if n == 0 {
                        bail!("malformed FEN '{fen}': empty-square run can't be 0");
                    }
                    file += n;
                    continue;
                }
                if file >= 8 {
                    bail!("malformed FEN '{fen}': rank overflows 8 files");
                }
                let piece = Piece::try_from(c).with_context(|| format!("parsing FEN '{fen}'"))?;
                let index = (rank_index * 8 + file) as usize;
                squares[index] = Some(piece);
                file += 1;
            }
            if file != 8 {
                bail!("malformed FEN '{fen}': rank '{rank_fen}' does not cover 8 files");
            }
        }

        let side_to_move = Color::try_from(tokens[1])?;
        let castling = CastleRights::from_fen(tokens[2])?;
        let en_passant = match tokens[3] {
            "-" => None,
            square => Some(Square::try_from(square)?),
        };
        let halfmove_clock = tokens[4]
            .parse::<u32>()
            .with_context(|| format!("parsing halfmove clock '{}'", tokens[4]))?;
        let fullmove_number = tokens[5]
            .parse::<u32>()
            .with_context(|| format!("parsing fullmove number '{}'", tokens[5]))?;

        Ok(Self {
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Renders the position back to FEN. The exact inverse of
    /// [`Board::from_fen`]: ranks top-to-bottom, run-length-encoding empty
    /// squares.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank_from_top in 0..8u8 {
            let rank_index = 7 - rank_from_top;
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let index = (rank_index * 8 + file) as usize;
                match self.squares[index] {
                    Some(piece) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(piece.symbol());
                    },
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank_from_top != 7 {
                placement.push('/');
            }
        }

        let en_passant = match self.en_passant {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.side_to_move,
            self.castling.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Clears whichever castling rights a move touching `square` revokes:
    /// losing a rook's single right when its home square is an origin or
    /// destination (including captures).
    fn revoke_rights_touching(&mut self, square: Square) {
        let revoked = match square {
            Square::A1 => CastleRights::WHITE_QUEENSIDE,
            Square::H1 => CastleRights::WHITE_KINGSIDE,
            Square::A8 => CastleRights::BLACK_QUEENSIDE,
            Square::H8 => CastleRights::BLACK_KINGSIDE,
            _ => CastleRights::empty(),
        };
        self.castling.remove(revoked);
    }

    /// Applies a single long-algebraic move, maintaining all five mutable
    /// FEN fields per `spec.md` section 4.1.
    pub fn apply_uci_move(&mut self, uci: &str) -> anyhow::Result<()> {
        let mv = UciMove::parse(uci)?;
        let moved = self
            .piece_at(mv.from)
            .with_context(|| format!("no piece on {} to play '{uci}'", mv.from))?;
        let mover = moved.color;
        let captured = self.piece_at(mv.to);
        let is_en_passant_capture =
            self.en_passant == Some(mv.to) && moved.kind == PieceKind::Pawn;

        self.revoke_rights_touching(mv.from);
        self.revoke_rights_touching(mv.to);
        if moved.kind == PieceKind::King {
            match mover {
                Color::White if mv.from == Square::E1 => self.castling.remove(
                    CastleRights::WHITE_KINGSIDE | CastleRights::WHITE_QUEENSIDE,
                ),
                Color::Black if mv.from == Square::E8 => self.castling.remove(
                    CastleRights::BLACK_KINGSIDE | CastleRights::BLACK_QUEENSIDE,
                ),
                _ => {},
            }
        }

        self.squares[mv.from.index()] = None;
        self.squares[mv.to.index()] = Some(match mv.promotion {
            Some(kind) => Piece::new(mover, kind),
            None => moved,
        });

        if is_en_passant_capture {
            // The captured pawn sits on the same file as `to`, one rank
            // behind it relative to the mover — which is exactly `from`'s
            // rank, since a pawn capture moves diagonally by one rank.
            let captured_square = Square::new(mv.to.file(), mv.from.rank());
            self.squares[captured_square.index()] = None;
        }

        if moved.kind == PieceKind::King {
            let rook_move = match (mv.from, mv.to) {
                (Square::E1, Square::G1) => Some((Square::H1, Square::F1)),
                (Square::E1, Square::C1) => Some((Square::A1, Square::D1)),
                (Square::E8, Square::G8) => Some((Square::H8, Square::F8)),
                (Square::E8, Square::C8) => Some((Square::A8, Square::D8)),
                _ => None,
            };
            if let Some((rook_from, rook_to)) = rook_move {
                self.squares[rook_to.index()] = self.squares[rook_from.index()];
                self.squares[rook_from.index()] = None;
            }
        }

        let is_capture = captured.is_some() || is_en_passant_capture;
        let is_pawn_move = moved.kind == PieceKind::Pawn;
        self.halfmove_clock = if is_pawn_move || is_capture {
            0
        } else {
            self.halfmove_clock + 1
        };

        let rank_distance = (mv.to.rank() as i16 - mv.from.rank() as i16).abs();
        self.en_passant = if is_pawn_move && rank_distance == 2 {
            Some(Square::new(mv.from.file(), super::core::Rank::between(mv.from.rank(), mv.to.rank())))
        } else {
            None
        };

        self.side_to_move = self.side_to_move.flip();
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        Ok(())
    }

    /// Applies a sequence of moves in order.
    pub fn apply_moves<'a>(&mut self, moves: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
        for mv in moves {
            self.apply_uci_move(mv)?;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fen_roundtrip_starting_position() {
        let board = Board::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(board.to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn fen_roundtrip_arbitrary() {
        let fen = "r1bqkb1r/pp3ppp/2n1pn2/2pp4/3P4/2N1PN2/PPP1BPPP/R1BQ1RK1 b kq - 3 6";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn startpos_replay_knight_out() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        board.apply_moves(["g1f3"]).unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
        );
    }

    #[test]
    fn en_passant_target_is_created() {
        let fen = "r1bqkb1r/pp3ppp/2n1pn2/2pp4/3P4/2N1PN2/PPP1BPPP/R1BQ1RK1 b kq - 3 6";
        let mut board = Board::from_fen(fen).unwrap();
        board
            .apply_moves(["c6b4", "h2h4", "b7b6", "h4h5", "g7g5"])
            .unwrap();
        assert_eq!(
            board.to_fen(),
            "r1bqkb1r/p4p1p/1p2pn2/2pp2pP/1n1P4/2N1PN2/PPP1BPP1/R1BQ1RK1 w kq g6 0 9"
        );
    }

    #[test]
    fn en_passant_capture_clears_captured_pawn() {
        let fen = "r1bqkb1r/p4p1p/1p2pn2/2pp2pP/1n1P4/2N1PN2/PPP1BPP1/R1BQ1RK1 w kq g6 0 9";
        let mut board = Board::from_fen(fen).unwrap();
        board.apply_moves(["h5g6"]).unwrap();
        assert_eq!(
            board.to_fen(),
            "r1bqkb1r/p4p1p/1p2pnP1/2pp4/1n1P4/2N1PN2/PPP1BPP1/R1BQ1RK1 b kq - 0 9"
        );
    }

    #[test]
    fn kingside_castle_moves_rook_and_clears_rights() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        board
            .apply_moves([
                "g1f3", "d7d5", "e2e3", "c7c5", "b1c3", "g8f6", "d2d4", "e7e6", "f1e2", "b8c6",
                "e1g1",
            ])
            .unwrap();
        assert_eq!(
            board.to_fen(),
            "r1bqkb1r/pp3ppp/2n1pn2/2pp4/3P4/2N1PN2/PPP1BPPP/R1BQ1RK1 b kq - 3 6"
        );
    }

    #[test]
    fn promotion_replaces_destination_piece() {
        let mut board = Board::from_fen("8/P7/8/8/8/8/8/k1K5 w - - 0 1").unwrap();
        board.apply_moves(["a7a8q"]).unwrap();
        assert_eq!(board.to_fen(), "Q7/8/8/8/8/8/8/k1K5 b - - 0 1");
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_move_and_capture() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        board.apply_moves(["g1f3", "g8f6"]).unwrap();
        assert_eq!(board.to_fen().split(' ').nth(4).unwrap(), "2");
        board.apply_moves(["e2e4"]).unwrap();
        assert_eq!(board.to_fen().split(' ').nth(4).unwrap(), "0");
    }
}
