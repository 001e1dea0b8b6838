//! Browser tests. Run with `wasm-pack test --headless --firefox crates/durfee-wasm`.

#![cfg(target_arch = "wasm32")]

use durfee_core::{Color, Piece, PieceKind, PixelPos, ViewportMetrics};
use durfee_frontend::{FrontendConfig, PieceId, StatusLayout, Surface};
use durfee_wasm::{DomSurface, PIECE_ATTR};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount() -> DomSurface {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    root.set_id("game");
    document.body().unwrap().append_child(&root).unwrap();
    DomSurface::mount(&document, &FrontendConfig::default()).unwrap()
}

#[wasm_bindgen_test]
fn spawn_and_remove_piece() {
    let mut surface = mount();
    let metrics = ViewportMetrics::compute(800.0, 900.0, 8);
    surface.layout(&metrics);
    surface.spawn_piece(
        PieceId(1),
        Piece::new(PieceKind::Pawn, Color::White),
        PixelPos::new(400.0, 100.0),
        100.0,
    );

    let selector = format!("[{}=\"1\"]", PIECE_ATTR);
    let img = surface
        .container()
        .query_selector(&selector)
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(img.style().get_property_value("left").unwrap(), "400px");
    assert_eq!(img.style().get_property_value("top").unwrap(), "100px");
    assert!(img.get_attribute("src").unwrap().ends_with("white_pawn.svg"));

    surface.remove_piece(PieceId(1));
    assert!(surface.container().query_selector(&selector).unwrap().is_none());
    surface.container().remove();
}

#[wasm_bindgen_test]
fn status_text_is_not_markup() {
    let mut surface = mount();
    let layout = StatusLayout {
        top: 800.0,
        width: 800.0,
        height: 100.0,
        font_size: 50.0,
    };
    surface.show_status("<b>Your turn...</b>", &layout);
    let text = surface.container().text_content().unwrap_or_default();
    assert!(text.contains("<b>Your turn...</b>"));
    surface.container().remove();
}
