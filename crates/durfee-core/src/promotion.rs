//! Promotion argument passed along with every move request.

use serde::{Deserialize, Serialize};

/// Piece a pawn should promote to if the move turns out to be a promotion.
///
/// The frontend never prompts for this; the configured default is sent with
/// every move and the engine ignores it for non-promoting moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionHint {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionHint {
    /// Returns the lowercase letter the engine expects (`q`, `r`, `b`, `n`).
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            PromotionHint::Queen => 'q',
            PromotionHint::Rook => 'r',
            PromotionHint::Bishop => 'b',
            PromotionHint::Knight => 'n',
        }
    }

    /// Returns the letter as an ASCII code, the form it crosses the engine ABI in.
    #[inline]
    pub const fn ascii(self) -> u8 {
        self.to_char() as u8
    }
}
