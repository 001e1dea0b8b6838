//! Piece color representation.

/// The two sides.
///
/// The discriminant is the value of the color bit (bit 3) of a piece byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// Creates a color from the single color bit (only the lowest bit is read).
    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Returns the value of the color bit.
    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase name used in asset file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_bit() {
        assert_eq!(Color::from_bit(0), Color::Black);
        assert_eq!(Color::from_bit(1), Color::White);
        assert_eq!(Color::from_bit(3), Color::White);
        assert_eq!(Color::White.bit(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "white");
        assert_eq!(format!("{}", Color::Black), "black");
    }
}
