//! Board primitives shared by [`crate::chess::board`]: squares, files,
//! ranks, colors, pieces, and castling rights.

use std::fmt;

use anyhow::bail;
use bitflags::bitflags;

/// Number of files (and ranks) on a standard chessboard.
pub const BOARD_WIDTH: u8 = 8;
/// Number of squares on a standard chessboard.
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A column of the board, `a` through `h`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(FILES[file as usize - 'a' as usize]),
            _ => bail!("unknown file: expected within 'a'..='h', got '{file}'"),
        }
    }
}

const FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

/// A row of the board, rank 1 through rank 8 (zero-indexed internally).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

const RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(RANKS[rank as usize - '1' as usize]),
            _ => bail!("unknown rank: expected within '1'..='8', got '{rank}'"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A board square, index 0 = a1 .. 63 = h8, matching the little-endian
/// rank-major numbering used throughout the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Builds a square from its file/rank pair.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file as u8 + (rank as u8) * BOARD_WIDTH)
    }

    /// Zero-based index into a 64-square array, a1 = 0, h8 = 63.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn file(self) -> File {
        FILES[(self.0 % BOARD_WIDTH) as usize]
    }

    #[must_use]
    pub fn rank(self) -> Rank {
        RANKS[(self.0 / BOARD_WIDTH) as usize]
    }
}

impl Rank {
    /// The rank halfway between two ranks one or two steps apart, used to
    /// compute the square a pawn passed over on a two-square push.
    #[must_use]
    pub fn between(a: Self, b: Self) -> Self {
        RANKS[((a as u8 + b as u8) / 2) as usize]
    }
}

#[allow(missing_docs)]
impl Square {
    pub const A1: Self = Self::new(File::A, Rank::One);
    pub const C1: Self = Self::new(File::C, Rank::One);
    pub const D1: Self = Self::new(File::D, Rank::One);
    pub const E1: Self = Self::new(File::E, Rank::One);
    pub const F1: Self = Self::new(File::F, Rank::One);
    pub const G1: Self = Self::new(File::G, Rank::One);
    pub const H1: Self = Self::new(File::H, Rank::One);
    pub const A8: Self = Self::new(File::A, Rank::Eight);
    pub const C8: Self = Self::new(File::C, Rank::Eight);
    pub const D8: Self = Self::new(File::D, Rank::Eight);
    pub const E8: Self = Self::new(File::E, Rank::Eight);
    pub const F8: Self = Self::new(File::F, Rank::Eight);
    pub const G8: Self = Self::new(File::G, Rank::Eight);
    pub const H8: Self = Self::new(File::H, Rank::Eight);
}

impl TryFrom<usize> for Square {
    type Error = anyhow::Error;

    fn try_from(index: usize) -> anyhow::Result<Self> {
        if index >= BOARD_SIZE as usize {
            bail!("unknown square index: needs to be in 0..{BOARD_SIZE}, got {index}");
        }
        Ok(Self(index as u8))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("unknown square: should be two chars, got '{square}'");
        }
        let file = File::try_from(bytes[0] as char)?;
        let rank = Rank::try_from(bytes[1] as char)?;
        Ok(Self::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("unknown side to move: expected 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// A chess piece kind, independent of color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Algebraic symbol used in FEN, uppercase. Color is applied by the caller.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }

    /// Parses the promotion piece letter from a 5-character UCI move
    /// (`e7e8q` -> queen). Only promotable pieces are valid.
    pub fn from_promotion_letter(letter: char) -> anyhow::Result<Self> {
        match letter.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("unknown promotion piece: '{letter}'"),
        }
    }
}

/// A square's occupant: a colored piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Renders as the FEN letter: uppercase for white, lowercase for black.
    #[must_use]
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'Q' => PieceKind::Queen,
            'R' => PieceKind::Rook,
            'B' => PieceKind::Bishop,
            'N' => PieceKind::Knight,
            'P' => PieceKind::Pawn,
            _ => bail!("unknown piece symbol: expected within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

bitflags! {
    /// Which castling moves are still available. One flag per rook: the
    /// Go source's "WK/WQ/BK/BQ" fields from `spec.md` section 3.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        const WHITE_KINGSIDE  = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE  = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastleRights {
    /// Parses the castling field of a FEN (`KQkq`, `Kq`, `-`, ...).
    pub fn from_fen(field: &str) -> anyhow::Result<Self> {
        if field == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        for c in field.chars() {
            rights |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => bail!("unknown castling rights symbol: '{c}' in '{field}'"),
            };
        }
        Ok(rights)
    }

    /// Renders in FEN order: `KQkq`, or `-` if none remain.
    #[must_use]
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.contains(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.contains(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.contains(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.contains(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn square_roundtrip() {
        assert_eq!(Square::try_from("a1").unwrap().index(), 0);
        assert_eq!(Square::try_from("h1").unwrap().index(), 7);
        assert_eq!(Square::try_from("a8").unwrap().index(), 56);
        assert_eq!(Square::try_from("h8").unwrap().index(), 63);
        assert_eq!(Square::try_from("e4").unwrap().to_string(), "e4");
    }

    #[test]
    fn castle_rights_roundtrip() {
        assert_eq!(CastleRights::from_fen("-").unwrap().to_fen(), "-");
        assert_eq!(CastleRights::from_fen("KQkq").unwrap().to_fen(), "KQkq");
        assert_eq!(CastleRights::from_fen("Kq").unwrap().to_fen(), "Kq");
    }

    #[test]
    fn piece_symbol() {
        let white_knight = Piece::try_from('N').unwrap();
        assert_eq!(white_knight.symbol(), 'N');
        let black_knight = Piece::try_from('n').unwrap();
        assert_eq!(black_knight.symbol(), 'n');
    }

    #[test]
    fn promotion_letter() {
        assert_eq!(PieceKind::from_promotion_letter('q').unwrap(), PieceKind::Queen);
        assert_eq!(PieceKind::from_promotion_letter('N').unwrap(), PieceKind::Knight);
        assert!(PieceKind::from_promotion_letter('x').is_err());
    }
}
