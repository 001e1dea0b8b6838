//! Rebuilds the visual board from the engine's board buffer.

use durfee_core::{Piece, PixelPos, Square, ViewportMetrics};

use crate::{DragController, DragState, EngineBridge, EngineError, EngineModule, PieceId, Surface};

/// One rendered piece. Lives from the redraw that created it until the next
/// redraw starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceView {
    pub id: PieceId,
    pub piece: Piece,
    /// Square the piece occupied in the buffer when it was drawn.
    pub origin: Square,
    /// Current top-left position; differs from the origin while dragged.
    pub position: PixelPos,
    pub size: f64,
    pub drag: DragState,
}

/// Owns the piece views of the current frame.
#[derive(Debug)]
pub struct BoardRenderer {
    board_size: u8,
    views: Vec<PieceView>,
    next_id: u32,
}

impl BoardRenderer {
    pub fn new(board_size: u8) -> Self {
        BoardRenderer {
            board_size,
            views: Vec::new(),
            next_id: 0,
        }
    }

    /// Discards every view and draws the buffer afresh.
    ///
    /// After this returns, the views are exactly the non-empty squares of
    /// the buffer, each at its square's origin and sized for `metrics`.
    /// Bytes that do not decode to a piece are skipped with a warning.
    /// Returns the number of pieces drawn.
    pub fn redraw<M: EngineModule, S: Surface>(
        &mut self,
        bridge: &EngineBridge<M>,
        metrics: &ViewportMetrics,
        drag: &mut DragController,
        surface: &mut S,
    ) -> Result<usize, EngineError> {
        for view in self.views.drain(..) {
            surface.remove_piece(view.id);
        }
        surface.layout(metrics);
        drag.rebind(*metrics);

        let board = bridge.read_board_view(self.board_size)?;
        for (square, code) in board.squares() {
            let piece = match code.decode() {
                Ok(Some(piece)) => piece,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(%square, error = %e, "skipping undecodable square");
                    continue;
                }
            };
            let view = PieceView {
                id: PieceId(self.next_id),
                piece,
                origin: square,
                position: metrics.square_origin(square),
                size: metrics.piece_px,
                drag: DragState::Idle,
            };
            self.next_id = self.next_id.wrapping_add(1);
            surface.spawn_piece(view.id, view.piece, view.position, view.size);
            self.views.push(view);
        }

        tracing::debug!(
            pieces = self.views.len(),
            occupied = board.occupied(),
            piece_px = metrics.piece_px,
            "board redrawn"
        );
        Ok(self.views.len())
    }

    pub fn views(&self) -> &[PieceView] {
        &self.views
    }

    pub fn view_mut(&mut self, id: PieceId) -> Option<&mut PieceView> {
        self.views.iter_mut().find(|v| v.id == id)
    }
}
