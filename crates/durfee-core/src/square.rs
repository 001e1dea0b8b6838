//! Board square representation.

use std::fmt;

/// A cell on the board, addressed by column `x` and row `y`.
///
/// The board buffer is row-major: the byte for `(x, y)` lives at
/// `y * board_size + x`. A `Square` does not know the board size; use
/// [`Square::clamped`] when the coordinates come from outside.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Square { x, y }
    }

    /// Creates a square from its row-major buffer index.
    #[inline]
    pub const fn from_index(index: usize, size: u8) -> Option<Self> {
        let size = size as usize;
        if size == 0 || index >= size * size {
            return None;
        }
        Some(Square::new((index % size) as u8, (index / size) as u8))
    }

    /// Returns the row-major buffer index on a `size`x`size` board.
    #[inline]
    pub const fn index(self, size: u8) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Clamps arbitrary (possibly negative) coordinates onto the board.
    pub fn clamped(x: i64, y: i64, size: u8) -> Self {
        let max = i64::from(size.saturating_sub(1));
        Square::new(x.clamp(0, max) as u8, y.clamp(0, max) as u8)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let sq = Square::new(4, 1);
        assert_eq!(sq.index(8), 12);
        assert_eq!(Square::from_index(12, 8), Some(sq));
        assert_eq!(Square::from_index(64, 8), None);
        assert_eq!(Square::from_index(0, 0), None);
    }

    #[test]
    fn clamped_to_edges() {
        assert_eq!(Square::clamped(-3, 12, 8), Square::new(0, 7));
        assert_eq!(Square::clamped(3, 4, 8), Square::new(3, 4));
    }

    #[test]
    fn from_index_is_row_major() {
        assert_eq!(Square::from_index(0, 3), Some(Square::new(0, 0)));
        assert_eq!(Square::from_index(1, 3), Some(Square::new(1, 0)));
        assert_eq!(Square::from_index(3, 3), Some(Square::new(0, 1)));
        for i in 0..9 {
            assert_eq!(Square::from_index(i, 3).map(|sq| sq.index(3)), Some(i));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Square::new(4, 3).to_string(), "(4, 3)");
    }
}
