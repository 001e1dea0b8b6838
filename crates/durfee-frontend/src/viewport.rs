//! Tracks the available display area.

use durfee_core::ViewportMetrics;

/// Remembers the last window size and derives metrics from it.
///
/// Metrics are recomputed on every call rather than stored, so they can
/// never lag behind the window.
#[derive(Debug, Clone, Copy)]
pub struct ViewportManager {
    width: f64,
    height: f64,
    board_size: u8,
}

impl ViewportManager {
    pub fn new(board_size: u8) -> Self {
        ViewportManager {
            width: 0.0,
            height: 0.0,
            board_size,
        }
    }

    /// Records a new window size and returns the metrics for it.
    pub fn resize(&mut self, width: f64, height: f64) -> ViewportMetrics {
        self.width = width;
        self.height = height;
        self.metrics()
    }

    /// Metrics for the last recorded window size.
    pub fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics::compute(self.width, self.height, self.board_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let viewport = ViewportManager::new(8);
        assert_eq!(viewport.metrics().board_px, 0.0);
    }

    #[test]
    fn resize_recomputes() {
        let mut viewport = ViewportManager::new(8);
        let small = viewport.resize(400.0, 450.0);
        let large = viewport.resize(800.0, 900.0);
        assert_eq!(small.piece_px, 50.0);
        assert_eq!(large.piece_px, 100.0);
        assert_eq!(viewport.metrics(), large);
    }
}
