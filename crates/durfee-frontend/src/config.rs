//! Frontend configuration.
//!
//! Every field has a default, so an empty TOML document (or an empty JS
//! object in the browser) yields a working setup for the standard 8x8
//! engine build.

use durfee_core::{Piece, PromotionHint};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Largest board the layout code accepts.
const MAX_BOARD_SIZE: u8 = 16;

/// Settings for the board view and its engine connection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Squares per board edge; the engine buffer is `board_size²` bytes.
    pub board_size: u8,
    /// Longest engine string accepted before the terminator, in bytes.
    pub max_string_len: usize,
    /// URL the compiled engine module is fetched from.
    pub module_url: String,
    /// Directory holding the board and piece images.
    pub asset_dir: String,
    /// File name of the board background inside `asset_dir`.
    pub board_asset: String,
    /// Extension of the piece images.
    pub asset_extension: String,
    /// Id of the element the board is mounted in.
    pub container_id: String,
    /// Status font size as a fraction of the status bar height.
    pub status_font_ratio: f64,
    /// Promotion piece sent with every move.
    pub promotion: PromotionHint,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        FrontendConfig {
            board_size: 8,
            max_string_len: 4096,
            module_url: "dist/durfeechess.wasm".to_string(),
            asset_dir: "./assets".to_string(),
            board_asset: "board.svg".to_string(),
            asset_extension: "svg".to_string(),
            container_id: "game".to_string(),
            status_font_ratio: 0.5,
            promotion: PromotionHint::Queen,
        }
    }
}

impl FrontendConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FrontendConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "board_size must be between 1 and {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            )));
        }
        if self.max_string_len == 0 {
            return Err(ConfigError::Invalid(
                "max_string_len must be positive".to_string(),
            ));
        }
        if self.status_font_ratio.is_nan() || self.status_font_ratio <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "status_font_ratio must be positive, got {}",
                self.status_font_ratio
            )));
        }
        Ok(())
    }

    /// URL of the image for `piece`, e.g. `./assets/white_pawn.svg`.
    pub fn piece_url(&self, piece: Piece) -> String {
        format!(
            "{}/{}.{}",
            self.asset_dir.trim_end_matches('/'),
            piece.asset_name(),
            self.asset_extension
        )
    }

    /// URL of the board background.
    pub fn board_url(&self) -> String {
        format!(
            "{}/{}",
            self.asset_dir.trim_end_matches('/'),
            self.board_asset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use durfee_core::{Color, PieceKind};

    #[test]
    fn empty_document_uses_defaults() {
        let config = FrontendConfig::from_toml_str("").unwrap();
        assert_eq!(config, FrontendConfig::default());
        assert_eq!(config.board_size, 8);
    }

    #[test]
    fn overrides() {
        let config = FrontendConfig::from_toml_str(
            r#"
            board_size = 10
            asset_dir = "/static/pieces/"
            asset_extension = "png"
            promotion = "knight"
            "#,
        )
        .unwrap();
        assert_eq!(config.board_size, 10);
        assert_eq!(config.promotion, PromotionHint::Knight);
        assert_eq!(
            config.piece_url(Piece::new(PieceKind::Rook, Color::Black)),
            "/static/pieces/black_rook.png"
        );
        assert_eq!(config.board_url(), "/static/pieces/board.svg");
    }

    #[test]
    fn default_urls() {
        let config = FrontendConfig::default();
        assert_eq!(
            config.piece_url(Piece::new(PieceKind::Pawn, Color::White)),
            "./assets/white_pawn.svg"
        );
        assert_eq!(config.board_url(), "./assets/board.svg");
    }

    #[test]
    fn rejects_zero_board() {
        let err = FrontendConfig::from_toml_str("board_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_string_limit() {
        let err = FrontendConfig::from_toml_str("max_string_len = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = FrontendConfig::from_toml_str("board_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
