//! Pixel layout derived from the available display area.

use crate::Square;

/// A position in CSS pixels relative to the top-left corner of the board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        PixelPos { x, y }
    }

    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        PixelPos::new(self.x + dx, self.y + dy)
    }
}

/// Sizing for one frame, recomputed from the window size on every redraw.
///
/// The board is square and sits in the top-left corner; the status bar sits
/// directly beneath it with the same width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Available width.
    pub width: f64,
    /// Available height.
    pub height: f64,
    /// Edge length of the board graphic.
    pub board_px: f64,
    /// Edge length of one square (and of every piece).
    pub piece_px: f64,
    /// Height of the status bar.
    pub status_px: f64,
    /// Squares per board edge.
    pub board_size: u8,
}

impl ViewportMetrics {
    /// Derives the layout for a `width`x`height` area.
    ///
    /// `status = min(height, width) / board_size`,
    /// `board = min(height - status, width)`, `piece = board / board_size`.
    /// Negative or non-finite dimensions are treated as zero.
    pub fn compute(width: f64, height: f64, board_size: u8) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);
        let n = f64::from(board_size.max(1));
        let status_px = (height / n).min(width / n);
        let board_px = (height - status_px).min(width).max(0.0);
        ViewportMetrics {
            width,
            height,
            board_px,
            piece_px: board_px / n,
            status_px,
            board_size: board_size.max(1),
        }
    }

    /// Returns the top-left pixel of `square`.
    #[inline]
    pub fn square_origin(&self, square: Square) -> PixelPos {
        PixelPos::new(
            f64::from(square.x) * self.piece_px,
            f64::from(square.y) * self.piece_px,
        )
    }

    /// Returns the top-left position that centers a piece on `pointer`.
    #[inline]
    pub fn centered_on(&self, pointer: PixelPos) -> PixelPos {
        let half = self.piece_px / 2.0;
        pointer.offset(-half, -half)
    }

    /// Resolves a piece's top-left position to the nearest square.
    ///
    /// Each coordinate is divided by the piece size, rounded half-up and
    /// clamped to `[0, board_size - 1]`, so positions off the board land on
    /// the nearest edge square.
    pub fn snap(&self, pos: PixelPos) -> Square {
        if self.piece_px.is_nan() || self.piece_px <= 0.0 {
            return Square::new(0, 0);
        }
        let x = (pos.x / self.piece_px + 0.5).floor();
        let y = (pos.y / self.piece_px + 0.5).floor();
        Square::clamped(to_coord(x), to_coord(y), self.board_size)
    }

    /// Top edge of the status bar.
    #[inline]
    pub fn status_top(&self) -> f64 {
        self.board_px
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn to_coord(v: f64) -> i64 {
    if v.is_nan() {
        0
    } else {
        // Saturating cast; clamping happens afterwards.
        v as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn landscape_window() {
        let m = ViewportMetrics::compute(1200.0, 800.0, 8);
        assert_eq!(m.status_px, 100.0);
        assert_eq!(m.board_px, 700.0);
        assert_eq!(m.piece_px, 87.5);
        assert_eq!(m.status_top(), 700.0);
    }

    #[test]
    fn portrait_window() {
        let m = ViewportMetrics::compute(400.0, 1000.0, 8);
        assert_eq!(m.status_px, 50.0);
        assert_eq!(m.board_px, 400.0);
        assert_eq!(m.piece_px, 50.0);
    }

    #[test]
    fn degenerate_window() {
        let m = ViewportMetrics::compute(-5.0, f64::NAN, 8);
        assert_eq!(m.board_px, 0.0);
        assert_eq!(m.piece_px, 0.0);
        assert_eq!(m.snap(PixelPos::new(30.0, 30.0)), Square::new(0, 0));
    }

    #[test]
    fn square_origin() {
        let m = ViewportMetrics::compute(800.0, 900.0, 8);
        assert_eq!(m.piece_px, 100.0);
        assert_eq!(
            m.square_origin(Square::new(4, 1)),
            PixelPos::new(400.0, 100.0)
        );
    }

    #[test]
    fn snap_rounds_half_up() {
        let m = ViewportMetrics::compute(800.0, 900.0, 8);
        assert_eq!(m.snap(PixelPos::new(449.0, 149.9)), Square::new(4, 1));
        assert_eq!(m.snap(PixelPos::new(450.0, 150.0)), Square::new(5, 2));
    }

    #[test]
    fn snap_clamps_off_board() {
        let m = ViewportMetrics::compute(800.0, 900.0, 8);
        assert_eq!(m.snap(PixelPos::new(-400.0, 5000.0)), Square::new(0, 7));
        assert_eq!(m.snap(PixelPos::new(f64::INFINITY, -1.0)), Square::new(7, 0));
    }

    proptest! {
        #[test]
        fn pointer_inside_square_resolves_to_square(
            width in 80u32..3000,
            height in 90u32..3000,
            x in 0u8..8,
            y in 0u8..8,
            fx in 0.001f64..0.999,
            fy in 0.001f64..0.999,
        ) {
            let m = ViewportMetrics::compute(f64::from(width), f64::from(height), 8);
            let square = Square::new(x, y);
            let origin = m.square_origin(square);
            let pointer = origin.offset(fx * m.piece_px, fy * m.piece_px);
            prop_assert_eq!(m.snap(m.centered_on(pointer)), square);
            prop_assert_eq!(m.snap(origin), square);
        }

        #[test]
        fn snap_never_leaves_board(
            px in -1.0e6f64..1.0e6,
            py in -1.0e6f64..1.0e6,
            size in 1u8..16,
        ) {
            let m = ViewportMetrics::compute(640.0, 480.0, size);
            let sq = m.snap(PixelPos::new(px, py));
            prop_assert!(sq.x < size);
            prop_assert!(sq.y < size);
        }
    }
}
