//! The visual tree the board is drawn into.

use durfee_core::{Piece, PixelPos, ViewportMetrics};

use crate::StatusLayout;

/// Identifies one piece view for the lifetime of a single redraw.
///
/// Ids are never reused, so an event that names a piece from an earlier
/// redraw can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visual tree operations needed by the renderer and drag controller.
///
/// Positions are relative to the top-left corner of the board.
pub trait Surface {
    /// Sizes the container and the board graphic for a new frame.
    fn layout(&mut self, metrics: &ViewportMetrics);

    /// Adds a `size`x`size` image of `piece` with its top-left at `at`.
    fn spawn_piece(&mut self, id: PieceId, piece: Piece, at: PixelPos, size: f64);

    /// Moves an existing piece.
    fn place_piece(&mut self, id: PieceId, at: PixelPos);

    /// Brings a piece in front of all its siblings.
    fn raise_piece(&mut self, id: PieceId);

    /// Removes a piece from the tree.
    fn remove_piece(&mut self, id: PieceId);

    /// Shows `text` verbatim in the status area.
    fn show_status(&mut self, text: &str, layout: &StatusLayout);

    /// Shows an unrecoverable error to the user.
    fn show_fatal(&mut self, text: &str);
}
