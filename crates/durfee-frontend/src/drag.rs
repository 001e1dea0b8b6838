//! Pointer-driven piece relocation.

use std::fmt;

use durfee_core::{PixelPos, PromotionHint, Square, ViewportMetrics};

use crate::{PieceId, PieceView, Surface};

/// Per-piece pointer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// A candidate move, forwarded to the engine unjudged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: PromotionHint,
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.promotion.to_char())
    }
}

/// Drives the Idle/Dragging machine of each piece view.
///
/// The controller never decides legality. Releasing a piece snaps it to the
/// nearest square straight away and produces a [`MoveRequest`]; whether the
/// piece stays there is settled by the next redraw from the engine.
#[derive(Debug, Clone)]
pub struct DragController {
    metrics: ViewportMetrics,
    promotion: PromotionHint,
    active: Option<PieceId>,
}

impl DragController {
    pub fn new(board_size: u8, promotion: PromotionHint) -> Self {
        DragController {
            metrics: ViewportMetrics::compute(0.0, 0.0, board_size),
            promotion,
            active: None,
        }
    }

    /// Adopts the metrics of a new redraw. Any drag in progress belonged to
    /// a view that no longer exists and is forgotten.
    pub fn rebind(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
        self.active = None;
    }

    /// Forgets the drag in progress without producing a move.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// The piece currently being dragged, if any.
    pub fn active(&self) -> Option<PieceId> {
        self.active
    }

    /// Idle -> Dragging. Raises the piece above its siblings.
    pub fn press<S: Surface>(&mut self, view: &mut PieceView, surface: &mut S) -> bool {
        if view.drag != DragState::Idle {
            return false;
        }
        view.drag = DragState::Dragging;
        self.active = Some(view.id);
        surface.raise_piece(view.id);
        true
    }

    /// While dragging, centers the piece on the pointer.
    pub fn track<S: Surface>(
        &mut self,
        view: &mut PieceView,
        pointer: PixelPos,
        surface: &mut S,
    ) -> bool {
        if view.drag != DragState::Dragging {
            return false;
        }
        view.position = self.metrics.centered_on(pointer);
        surface.place_piece(view.id, view.position);
        true
    }

    /// Dragging -> Idle. Snaps the piece onto the nearest square and returns
    /// the move from its origin to that square.
    pub fn release<S: Surface>(
        &mut self,
        view: &mut PieceView,
        surface: &mut S,
    ) -> Option<MoveRequest> {
        if view.drag != DragState::Dragging {
            return None;
        }
        view.drag = DragState::Idle;
        if self.active == Some(view.id) {
            self.active = None;
        }
        let to = self.metrics.snap(view.position);
        view.position = self.metrics.square_origin(to);
        surface.place_piece(view.id, view.position);
        Some(MoveRequest {
            from: view.origin,
            to,
            promotion: self.promotion,
        })
    }
}
