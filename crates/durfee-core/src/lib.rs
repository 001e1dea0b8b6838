//! Core types for the durfee board view.
//!
//! This crate provides the fundamental types shared by the frontend and the
//! browser adapter:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`PieceCode`] for decoding the engine's one-byte square encoding
//! - [`Square`] for board coordinates
//! - [`ViewportMetrics`] and [`PixelPos`] for pixel layout
//! - [`PromotionHint`] for the promotion argument of a move request

mod color;
mod metrics;
mod piece;
mod promotion;
mod square;

pub use color::Color;
pub use metrics::{PixelPos, ViewportMetrics};
pub use piece::{Piece, PieceCode, PieceKind};
pub use promotion::PromotionHint;
pub use square::Square;

use thiserror::Error;

/// Errors that can occur when decoding board bytes into typed values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown piece type in byte {0:#04x}")]
    UnknownPieceType(u8),
}
