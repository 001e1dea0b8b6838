//! Board view state machine for an externally compiled game engine.
//!
//! The engine owns the rules and a `board_size²` byte buffer describing every
//! square. This crate keeps a visual board in step with that buffer:
//!
//! - [`EngineBridge`] calls the engine's entry points and reads its board
//! - [`EngineCallbacks`] receives the engine's callbacks as they fire
//! - [`BoardRenderer`] rebuilds every piece view from the buffer
//! - [`DragController`] turns pointer input into move requests
//! - [`StatusChannel`] holds the engine's latest status line
//! - [`Frontend`] wires them together behind a single-threaded event API
//!
//! The engine and the visual tree are reached only through the
//! [`EngineModule`] and [`Surface`] traits, so the whole state machine runs
//! natively in tests against an in-memory engine.
//!
//! # Example
//!
//! ```ignore
//! let callbacks = EngineCallbacks::new(config.max_string_len);
//! let engine = load_engine(&config.module_url, &callbacks).await?;
//! let mut frontend = Frontend::new(engine, callbacks, surface, config)?;
//! frontend.start(1280.0, 720.0)?;
//! ```

mod bridge;
mod config;
mod drag;
mod error;
mod frontend;
mod renderer;
mod sink;
mod status;
mod surface;
mod viewport;

pub use bridge::{
    read_cstring, BoardView, EngineBridge, EngineCallbacks, EngineEvent, EngineModule,
    LinearMemory,
};
pub use config::FrontendConfig;
pub use drag::{DragController, DragState, MoveRequest};
pub use error::{ConfigError, EngineError, FrontendError};
pub use frontend::{Frontend, MoveTicket, Phase};
pub use renderer::{BoardRenderer, PieceView};
pub use sink::{LogSink, TracingSink};
pub use status::{StatusChannel, StatusLayout};
pub use surface::{PieceId, Surface};
pub use viewport::ViewportManager;
