//! The engine module, instantiated through the browser's WebAssembly API.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use durfee_core::{PromotionHint, Square};
use durfee_frontend::{EngineCallbacks, EngineError, EngineModule, LinearMemory};
use js_sys::{Array, Function, Object, Reflect, Uint8Array, WebAssembly};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// The engine's exported memory.
#[derive(Clone)]
pub struct WasmMemory(WebAssembly::Memory);

impl LinearMemory for WasmMemory {
    fn size(&self) -> usize {
        Uint8Array::new(&self.0.buffer()).length() as usize
    }

    fn read(&self, offset: usize, len: usize) -> Result<Cow<'_, [u8]>, EngineError> {
        // The buffer object is replaced whenever the memory grows, so it is
        // fetched again on every read.
        let bytes = Uint8Array::new(&self.0.buffer());
        let size = bytes.length() as usize;
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= size)
            .ok_or(EngineError::OutOfBounds {
                offset,
                len,
                memory: size,
            })?;
        Ok(Cow::Owned(bytes.subarray(offset as u32, end as u32).to_vec()))
    }
}

/// The engine's memory as seen from its imports. Empty until the module
/// has been instantiated.
type MemorySlot = Rc<RefCell<Option<WasmMemory>>>;

/// Callbacks handed to the module as its `env` imports. String arguments are
/// decoded against the bound memory before the engine can reuse them.
struct Imports {
    _log: Closure<dyn FnMut(u32)>,
    _set_status: Closure<dyn FnMut(u32)>,
    _redraw: Closure<dyn FnMut()>,
    _fatal: Closure<dyn FnMut(u32)>,
}

impl Imports {
    fn new(callbacks: &EngineCallbacks, memory: &MemorySlot) -> Result<(Object, Self), JsValue> {
        let string_callback = |deliver: fn(&EngineCallbacks, &WasmMemory, usize)| {
            let callbacks = callbacks.clone();
            let memory = Rc::clone(memory);
            Closure::<dyn FnMut(u32)>::new(move |ptr: u32| match memory.borrow().as_ref() {
                Some(memory) => deliver(&callbacks, memory, ptr as usize),
                None => tracing::warn!(ptr, "engine callback fired before its memory was bound"),
            })
        };
        let log = string_callback(EngineCallbacks::log::<WasmMemory>);
        let set_status = string_callback(EngineCallbacks::set_status::<WasmMemory>);
        let fatal = string_callback(EngineCallbacks::fatal::<WasmMemory>);
        let redraw = {
            let callbacks = callbacks.clone();
            Closure::<dyn FnMut()>::new(move || callbacks.redraw())
        };

        let env = Object::new();
        Reflect::set(&env, &JsValue::from_str("console_log"), log.as_ref())?;
        Reflect::set(&env, &JsValue::from_str("set_status_msg"), set_status.as_ref())?;
        Reflect::set(&env, &JsValue::from_str("redraw"), redraw.as_ref())?;
        Reflect::set(&env, &JsValue::from_str("fatal"), fatal.as_ref())?;
        let imports = Object::new();
        Reflect::set(&imports, &JsValue::from_str("env"), &env)?;

        Ok((
            imports,
            Imports {
                _log: log,
                _set_status: set_status,
                _redraw: redraw,
                _fatal: fatal,
            },
        ))
    }
}

/// An instantiated engine module.
pub struct WasmEngine {
    memory: WasmMemory,
    board_offset: usize,
    init_game: Function,
    attempt_move: Function,
    _imports: Imports,
}

impl WasmEngine {
    /// Fetches and instantiates the module at `url`, wiring its imports to
    /// `callbacks`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModuleLoad`] when the fetch or instantiation
    /// fails and [`EngineError::MissingExport`] when the module does not
    /// expose the expected entry points.
    pub async fn load(url: &str, callbacks: &EngineCallbacks) -> Result<Self, EngineError> {
        let window = web_sys::window()
            .ok_or_else(|| EngineError::ModuleLoad("no window available".to_string()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(load_error)?
            .dyn_into::<Response>()
            .map_err(load_error)?;
        if !response.ok() {
            return Err(EngineError::ModuleLoad(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        let buffer = JsFuture::from(response.array_buffer().map_err(load_error)?)
            .await
            .map_err(load_error)?;
        let bytes = Uint8Array::new(&buffer).to_vec();

        let slot = MemorySlot::default();
        let (imports, closures) = Imports::new(callbacks, &slot).map_err(load_error)?;
        let result = JsFuture::from(WebAssembly::instantiate_buffer(&bytes, &imports))
            .await
            .map_err(load_error)?;
        let instance = Reflect::get(&result, &JsValue::from_str("instance"))
            .map_err(load_error)?
            .dyn_into::<WebAssembly::Instance>()
            .map_err(load_error)?;
        let exports = instance.exports();

        let memory = WasmMemory(export(&exports, "memory")?);
        *slot.borrow_mut() = Some(memory.clone());

        let engine = WasmEngine {
            memory,
            board_offset: board_offset(&exports)?,
            init_game: export(&exports, "init_game")?,
            attempt_move: export(&exports, "attempt_move")?,
            _imports: closures,
        };
        tracing::info!(url, board_offset = engine.board_offset, "engine module loaded");
        Ok(engine)
    }
}

impl EngineModule for WasmEngine {
    type Memory = WasmMemory;

    fn memory(&self) -> &WasmMemory {
        &self.memory
    }

    fn board_offset(&self) -> usize {
        self.board_offset
    }

    fn init_game(&mut self) -> Result<(), EngineError> {
        self.init_game
            .call0(&JsValue::NULL)
            .map(drop)
            .map_err(trap)
    }

    fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: PromotionHint,
    ) -> Result<(), EngineError> {
        let args = Array::new();
        for value in [from.x, from.y, to.x, to.y, promotion.ascii()] {
            args.push(&JsValue::from(value));
        }
        self.attempt_move
            .apply(&JsValue::NULL, &args)
            .map(drop)
            .map_err(trap)
    }
}

fn export<T: JsCast>(exports: &Object, name: &'static str) -> Result<T, EngineError> {
    Reflect::get(exports, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined())
        .and_then(|value| value.dyn_into::<T>().ok())
        .ok_or(EngineError::MissingExport(name))
}

/// `BOARD` is exported as a global holding the buffer's address. Depending
/// on the toolchain it arrives either as a plain number or as a
/// `WebAssembly.Global` wrapping one.
fn board_offset(exports: &Object) -> Result<usize, EngineError> {
    let value = Reflect::get(exports, &JsValue::from_str("BOARD"))
        .map_err(|_| EngineError::MissingExport("BOARD"))?;
    let address = match value.as_f64() {
        Some(address) => Some(address),
        None => Reflect::get(&value, &JsValue::from_str("value"))
            .ok()
            .and_then(|inner| inner.as_f64()),
    };
    match address {
        Some(address) if address >= 0.0 => Ok(address as usize),
        _ => Err(EngineError::MissingExport("BOARD")),
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

fn load_error(value: JsValue) -> EngineError {
    EngineError::ModuleLoad(describe(&value))
}

fn trap(value: JsValue) -> EngineError {
    EngineError::Trap(describe(&value))
}
