//! Piece representation and the engine's one-byte square encoding.

use crate::{Color, DecodeError};

/// The six kinds of pieces.
///
/// The discriminant is the value of the type bits (bits 0-2) of a piece byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// All piece kinds in encoding order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Creates a kind from the three type bits. Returns `None` for 0 and 7.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns the three type bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase name used in asset file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A colored piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Returns the asset stem, `{color}_{kind}` (e.g. `white_pawn`).
    pub fn asset_name(&self) -> String {
        format!("{}_{}", self.color, self.kind)
    }

    /// Encodes this piece as the engine writes it.
    #[inline]
    pub const fn code(self) -> PieceCode {
        PieceCode((self.color.bit() << PieceCode::COLOR_SHIFT) | self.kind.bits())
    }
}

/// One raw square byte as stored in the engine's board buffer.
///
/// Layout: `____CTTT`, where `TTT` selects the piece kind (1-6) and `C`
/// the color. [`PieceCode::EMPTY`] marks an empty square. The upper bits
/// are reserved and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCode(u8);

impl PieceCode {
    /// The empty-square sentinel (`-1` when read as a signed byte).
    pub const EMPTY: PieceCode = PieceCode(0xFF);

    const TYPE_MASK: u8 = 0b111;
    const COLOR_SHIFT: u8 = 3;

    #[inline]
    pub const fn new(byte: u8) -> Self {
        PieceCode(byte)
    }

    /// Returns the raw byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Decodes the byte.
    ///
    /// Returns `Ok(None)` for the sentinel and an error when the type bits
    /// do not name a piece.
    pub const fn decode(self) -> Result<Option<Piece>, DecodeError> {
        if self.is_empty() {
            return Ok(None);
        }
        let kind = match PieceKind::from_bits(self.0 & Self::TYPE_MASK) {
            Some(kind) => kind,
            None => return Err(DecodeError::UnknownPieceType(self.0)),
        };
        let color = Color::from_bit(self.0 >> Self::COLOR_SHIFT);
        Ok(Some(Piece { kind, color }))
    }
}

impl From<u8> for PieceCode {
    fn from(byte: u8) -> Self {
        PieceCode(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_table() {
        assert_eq!(
            PieceCode::new(0b01010).decode(),
            Ok(Some(Piece::new(PieceKind::Knight, Color::White)))
        );
        assert_eq!(
            PieceCode::new(0b0001).decode(),
            Ok(Some(Piece::new(PieceKind::Pawn, Color::Black)))
        );
        assert_eq!(
            PieceCode::new(0b1110).decode(),
            Ok(Some(Piece::new(PieceKind::King, Color::White)))
        );
    }

    #[test]
    fn sentinel_is_empty() {
        assert!(PieceCode::EMPTY.is_empty());
        assert_eq!(PieceCode::new(0xFF).decode(), Ok(None));
        assert_eq!(PieceCode::new((-1i8) as u8), PieceCode::EMPTY);
    }

    #[test]
    fn reserved_bits_ignored() {
        assert_eq!(
            PieceCode::new(0b0101_1100).decode(),
            Ok(Some(Piece::new(PieceKind::Rook, Color::White)))
        );
    }

    #[test]
    fn unknown_type_bits() {
        assert_eq!(
            PieceCode::new(0b1000).decode(),
            Err(DecodeError::UnknownPieceType(0b1000))
        );
        assert_eq!(
            PieceCode::new(0b0111).decode(),
            Err(DecodeError::UnknownPieceType(0b0111))
        );
    }

    #[test]
    fn code_matches_decode() {
        for kind in PieceKind::ALL {
            for color in [Color::Black, Color::White] {
                let piece = Piece::new(kind, color);
                assert_eq!(piece.code().decode(), Ok(Some(piece)));
            }
        }
    }

    #[test]
    fn asset_name() {
        assert_eq!(
            Piece::new(PieceKind::Queen, Color::Black).asset_name(),
            "black_queen"
        );
        assert_eq!(
            Piece::new(PieceKind::Pawn, Color::White).asset_name(),
            "white_pawn"
        );
    }
}
