//! Browser frontend for the durfee chess engine.
//!
//! Fetches the compiled engine module, mounts the board into the page and
//! forwards window and mouse events to a [`Frontend`].
//!
//! # Usage
//!
//! ```javascript
//! import init, { run } from 'durfee-wasm';
//!
//! await init();
//! await run({ module_url: "dist/durfeechess.wasm", asset_dir: "./assets" });
//! ```
//!
//! Every option is optional; see `FrontendConfig` for the full list.

mod dom;
mod engine;

use std::cell::RefCell;
use std::rc::Rc;

use durfee_core::PixelPos;
use durfee_frontend::{EngineCallbacks, Frontend, FrontendConfig, FrontendError, LogSink, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, Window};

pub use dom::{parse_piece_id, px, DomSurface, PIECE_ATTR};
pub use engine::{WasmEngine, WasmMemory};

type App = Frontend<WasmEngine, DomSurface>;

/// Writes engine log lines to the devtools console.
struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn log(&mut self, text: &str) {
        web_sys::console::log_1(&JsValue::from_str(text));
    }
}

/// Loads the engine and starts the board.
///
/// `options` is an optional object whose fields override the defaults of
/// `FrontendConfig`. A failure to load the engine is shown in the page and
/// returned as an error; nothing is playable in that case.
#[wasm_bindgen]
pub async fn run(options: JsValue) -> Result<(), JsError> {
    let config = parse_options(options)?;
    let window = web_sys::window().ok_or_else(|| JsError::new("no window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document available"))?;
    let mut surface = DomSurface::mount(&document, &config).map_err(js_error)?;

    let callbacks = EngineCallbacks::new(config.max_string_len);
    let engine = match WasmEngine::load(&config.module_url, &callbacks).await {
        Ok(engine) => engine,
        Err(e) => {
            surface.show_fatal(&e.to_string());
            return Err(JsError::new(&e.to_string()));
        }
    };

    let frontend = Frontend::new(engine, callbacks, surface, config)?.with_log_sink(ConsoleSink);
    let app = Rc::new(RefCell::new(frontend));
    wire_events(&window, &app).map_err(js_error)?;
    let (width, height) = window_size(&window);
    app.borrow_mut().start(width, height)?;
    Ok(())
}

fn parse_options(options: JsValue) -> Result<FrontendConfig, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(FrontendConfig::default());
    }
    let config: FrontendConfig = serde_wasm_bindgen::from_value(options)?;
    config.validate()?;
    Ok(config)
}

fn wire_events(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let container = app.borrow().surface().container().clone();

    let on_resize = {
        let app = Rc::clone(app);
        let window = window.clone();
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let (width, height) = window_size(&window);
            report(app.borrow_mut().resize(width, height));
        })
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let on_mouse_down = {
        let app = Rc::clone(app);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(id) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.get_attribute(PIECE_ATTR))
                .and_then(|attr| parse_piece_id(&attr))
            else {
                return;
            };
            if app.borrow_mut().pointer_down(id) {
                event.prevent_default();
            }
        })
    };
    container
        .add_event_listener_with_callback("mousedown", on_mouse_down.as_ref().unchecked_ref())?;
    on_mouse_down.forget();

    // Move and release are tracked on the window so a fast pointer cannot
    // slip off the piece mid-drag.
    let on_mouse_move = {
        let app = Rc::clone(app);
        let container = container.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let dragging = app.borrow().dragging();
            if let Some(id) = dragging {
                let pointer = pointer_position(&container, &event);
                if app.borrow_mut().pointer_move(id, pointer) {
                    event.prevent_default();
                }
            }
        })
    };
    window.add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;
    on_mouse_move.forget();

    let on_mouse_up = {
        let app = Rc::clone(app);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let dragging = app.borrow().dragging();
            if let Some(id) = dragging {
                event.prevent_default();
                report(app.borrow_mut().pointer_up(id).map(drop));
            }
        })
    };
    window.add_event_listener_with_callback("mouseup", on_mouse_up.as_ref().unchecked_ref())?;
    on_mouse_up.forget();

    Ok(())
}

/// Pointer position relative to the board's top-left corner.
fn pointer_position(container: &web_sys::HtmlElement, event: &MouseEvent) -> PixelPos {
    let rect = container.get_bounding_client_rect();
    PixelPos::new(
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

fn window_size(window: &Window) -> (f64, f64) {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (dimension(window.inner_width()), dimension(window.inner_height()))
}

/// Event handlers cannot return errors; halts are already visible in the
/// page, so they only need to reach the console.
fn report(result: Result<(), FrontendError>) {
    if let Err(e) = result {
        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
    }
}

fn js_error(value: JsValue) -> JsError {
    JsError::new(&value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
