//! DOM rendering of the board: one `<img>` per piece over a board `<img>`,
//! and a `<div>` status bar underneath.

use std::collections::HashMap;

use durfee_core::{Piece, PixelPos, ViewportMetrics};
use durfee_frontend::{FrontendConfig, PieceId, StatusLayout, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement};

/// Attribute carrying a piece image's [`PieceId`].
pub const PIECE_ATTR: &str = "data-piece";

pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    board: HtmlImageElement,
    status: HtmlElement,
    fatal: Option<HtmlElement>,
    pieces: HashMap<PieceId, HtmlImageElement>,
    config: FrontendConfig,
}

impl DomSurface {
    /// Builds the board and status elements inside the configured container.
    pub fn mount(document: &Document, config: &FrontendConfig) -> Result<Self, JsValue> {
        let container = document
            .get_element_by_id(&config.container_id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{} element", config.container_id)))?
            .dyn_into::<HtmlElement>()?;
        container.style().set_property("position", "relative")?;

        let board = create::<HtmlImageElement>(document, "img")?;
        board.set_src(&config.board_url());
        board.set_draggable(false);
        let style = board.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0px")?;
        style.set_property("top", "0px")?;
        container.append_child(&board)?;

        let status = create::<HtmlElement>(document, "div")?;
        let style = status.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0px")?;
        style.set_property("text-align", "center")?;
        style.set_property("font-family", "'Courier New', monospace")?;
        container.append_child(&status)?;

        Ok(DomSurface {
            document: document.clone(),
            container,
            board,
            status,
            fatal: None,
            pieces: HashMap::new(),
            config: config.clone(),
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }
}

impl Surface for DomSurface {
    fn layout(&mut self, metrics: &ViewportMetrics) {
        let style = self.container.style();
        let _ = style.set_property("width", &px(metrics.width));
        let _ = style.set_property("height", &px(metrics.height));
        let style = self.board.style();
        let _ = style.set_property("width", &px(metrics.board_px));
        let _ = style.set_property("height", &px(metrics.board_px));
    }

    fn spawn_piece(&mut self, id: PieceId, piece: Piece, at: PixelPos, size: f64) {
        let Ok(img) = create::<HtmlImageElement>(&self.document, "img") else {
            tracing::warn!(%id, "failed to create piece image");
            return;
        };
        img.set_src(&self.config.piece_url(piece));
        img.set_alt(&piece.asset_name());
        img.set_draggable(false);
        let _ = img.set_attribute(PIECE_ATTR, &id.0.to_string());
        let style = img.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("width", &px(size));
        let _ = style.set_property("height", &px(size));
        set_position(&img, at);
        let _ = self.container.append_child(&img);
        self.pieces.insert(id, img);
    }

    fn place_piece(&mut self, id: PieceId, at: PixelPos) {
        if let Some(img) = self.pieces.get(&id) {
            set_position(img, at);
        }
    }

    fn raise_piece(&mut self, id: PieceId) {
        // Re-appending moves the node to the end, on top of its siblings.
        if let Some(img) = self.pieces.get(&id) {
            let _ = self.container.append_child(img);
        }
    }

    fn remove_piece(&mut self, id: PieceId) {
        if let Some(img) = self.pieces.remove(&id) {
            img.remove();
        }
    }

    fn show_status(&mut self, text: &str, layout: &StatusLayout) {
        let style = self.status.style();
        let _ = style.set_property("top", &px(layout.top));
        let _ = style.set_property("width", &px(layout.width));
        let _ = style.set_property("height", &px(layout.height));
        let _ = style.set_property("font-size", &px(layout.font_size));
        self.status.set_text_content(Some(text));
    }

    fn show_fatal(&mut self, text: &str) {
        let banner = match self.fatal.take() {
            Some(banner) => banner,
            None => match create::<HtmlElement>(&self.document, "div") {
                Ok(banner) => {
                    banner.set_class_name("fatal");
                    let style = banner.style();
                    let _ = style.set_property("position", "absolute");
                    let _ = style.set_property("inset", "0");
                    let _ = style.set_property("display", "flex");
                    let _ = style.set_property("align-items", "center");
                    let _ = style.set_property("justify-content", "center");
                    let _ = style.set_property("background", "rgba(0, 0, 0, 0.6)");
                    let _ = style.set_property("color", "#fff");
                    let _ = style.set_property("font-family", "'Courier New', monospace");
                    banner
                }
                Err(_) => {
                    web_sys::console::error_1(&JsValue::from_str(text));
                    return;
                }
            },
        };
        banner.set_text_content(Some(text));
        let _ = self.container.append_child(&banner);
        self.fatal = Some(banner);
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(JsValue::from)
}

fn set_position(element: &HtmlElement, at: PixelPos) {
    let style = element.style();
    let _ = style.set_property("left", &px(at.x));
    let _ = style.set_property("top", &px(at.y));
}

/// Formats a CSS pixel length.
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Reads a [`PieceId`] back from the [`PIECE_ATTR`] attribute.
pub fn parse_piece_id(attr: &str) -> Option<PieceId> {
    attr.trim().parse().ok().map(PieceId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_formatting() {
        assert_eq!(px(87.5), "87.5px");
        assert_eq!(px(400.0), "400px");
    }

    #[test]
    fn piece_id_attribute() {
        assert_eq!(parse_piece_id("12"), Some(PieceId(12)));
        assert_eq!(parse_piece_id(" 3 "), Some(PieceId(3)));
        assert_eq!(parse_piece_id("rook"), None);
        assert_eq!(parse_piece_id(""), None);
    }
}
