//! Engine-supplied status line.

use durfee_core::ViewportMetrics;

use crate::Surface;

/// Placement of the status bar for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLayout {
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

impl StatusLayout {
    /// Places the bar directly under the board, as wide as the board.
    pub fn for_metrics(metrics: &ViewportMetrics, font_ratio: f64) -> Self {
        StatusLayout {
            top: metrics.status_top(),
            width: metrics.board_px,
            height: metrics.status_px,
            font_size: metrics.status_px * font_ratio,
        }
    }
}

/// Holds the latest status string pushed by the engine.
///
/// Only [`set`](Self::set) mutates it, and only the engine's status
/// callback calls `set`.
#[derive(Debug)]
pub struct StatusChannel {
    text: String,
    font_ratio: f64,
}

impl StatusChannel {
    pub fn new(font_ratio: f64) -> Self {
        StatusChannel {
            text: String::new(),
            font_ratio,
        }
    }

    /// Replaces the whole status line.
    pub fn set(&mut self, text: String) {
        self.text = text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Writes the current line into the status area.
    pub fn render<S: Surface>(&self, metrics: &ViewportMetrics, surface: &mut S) {
        let layout = StatusLayout::for_metrics(metrics, self.font_ratio);
        surface.show_status(&self.text, &layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_board() {
        let metrics = ViewportMetrics::compute(1200.0, 800.0, 8);
        let layout = StatusLayout::for_metrics(&metrics, 0.5);
        assert_eq!(layout.top, 700.0);
        assert_eq!(layout.width, 700.0);
        assert_eq!(layout.height, 100.0);
        assert_eq!(layout.font_size, 50.0);
    }

    #[test]
    fn set_replaces_wholesale() {
        let mut status = StatusChannel::new(0.5);
        assert_eq!(status.text(), "");
        status.set("Thinking...".to_string());
        status.set("Invalid move".to_string());
        assert_eq!(status.text(), "Invalid move");
    }
}
