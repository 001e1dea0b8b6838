//! Wires the engine, the renderer and pointer input together.

use durfee_core::{PixelPos, ViewportMetrics};

use crate::{
    BoardRenderer, DragController, EngineBridge, EngineCallbacks, EngineError, EngineEvent,
    EngineModule, FrontendConfig, FrontendError, LogSink, MoveRequest, PieceId, PieceView,
    StatusChannel, Surface, TracingSink, ViewportManager,
};

/// Whether the frontend still accepts input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// The engine reported a fatal error (or trapped); carries its message.
    Halted(String),
}

/// Acknowledgement handle for a submitted move.
///
/// The engine has no accept/reject reply. A ticket is settled by the first
/// redraw the engine requests after the move was sent; the board drawn by
/// that redraw is the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTicket {
    pub seq: u64,
    pub request: MoveRequest,
    pub settled: bool,
}

/// The board view.
///
/// Single-threaded and event driven: each method handles one external event
/// (resize, pointer, start-up) and runs every engine callback it provokes
/// to completion before returning.
pub struct Frontend<M: EngineModule, S: Surface> {
    bridge: EngineBridge<M>,
    surface: S,
    viewport: ViewportManager,
    renderer: BoardRenderer,
    drag: DragController,
    status: StatusChannel,
    sink: Box<dyn LogSink>,
    phase: Phase,
    pending: Option<MoveTicket>,
    next_seq: u64,
    redraws: u64,
}

impl<M: EngineModule, S: Surface> Frontend<M, S> {
    /// Builds a frontend around an instantiated engine.
    ///
    /// `callbacks` must be the ones handed to the engine's imports.
    pub fn new(
        module: M,
        callbacks: EngineCallbacks,
        surface: S,
        config: FrontendConfig,
    ) -> Result<Self, FrontendError> {
        config.validate()?;
        Ok(Frontend {
            bridge: EngineBridge::new(module, callbacks),
            surface,
            viewport: ViewportManager::new(config.board_size),
            renderer: BoardRenderer::new(config.board_size),
            drag: DragController::new(config.board_size, config.promotion),
            status: StatusChannel::new(config.status_font_ratio),
            sink: Box::new(TracingSink),
            phase: Phase::Running,
            pending: None,
            next_seq: 0,
            redraws: 0,
        })
    }

    /// Replaces the destination of engine log lines.
    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Initialises the engine and draws the first frame for a
    /// `width`x`height` window.
    ///
    /// The board is drawn once: by the engine's own redraw request if init
    /// made one, otherwise right after init returns. Callbacks fired while
    /// the module was being instantiated are handled here too, ahead of
    /// those from init.
    pub fn start(&mut self, width: f64, height: f64) -> Result<(), FrontendError> {
        self.ensure_running()?;
        self.viewport.resize(width, height);
        let events = match self.bridge.invoke_init() {
            Ok(events) => events,
            Err(e) => return Err(self.fail(e)),
        };
        let redraws = self.redraws;
        self.dispatch(events)?;
        if self.redraws == redraws {
            self.redraw()?;
        }
        tracing::info!(status = %self.status.text(), "engine initialised");
        Ok(())
    }

    /// Handles a window resize: exactly one redraw at the new size.
    ///
    /// Still honoured after a halt so the last board stays laid out.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), FrontendError> {
        self.viewport.resize(width, height);
        self.redraw()
    }

    /// Resynchronises the view with the board buffer and status line.
    pub fn redraw(&mut self) -> Result<(), FrontendError> {
        let metrics = self.viewport.metrics();
        if let Err(e) =
            self.renderer
                .redraw(&self.bridge, &metrics, &mut self.drag, &mut self.surface)
        {
            return Err(self.fail(e));
        }
        self.status.render(&metrics, &mut self.surface);
        self.redraws += 1;
        Ok(())
    }

    /// Pointer pressed on a piece. Returns whether a drag started.
    ///
    /// Ignored once halted or when `id` names a piece from an older redraw.
    pub fn pointer_down(&mut self, id: PieceId) -> bool {
        if self.is_halted() {
            return false;
        }
        match self.renderer.view_mut(id) {
            Some(view) => self.drag.press(view, &mut self.surface),
            None => false,
        }
    }

    /// Pointer moved while over (or dragging) a piece.
    pub fn pointer_move(&mut self, id: PieceId, pointer: PixelPos) -> bool {
        if self.is_halted() {
            return false;
        }
        match self.renderer.view_mut(id) {
            Some(view) => self.drag.track(view, pointer, &mut self.surface),
            None => false,
        }
    }

    /// Pointer released on a piece.
    ///
    /// If the piece was being dragged, it is snapped to the nearest square
    /// and the move is sent to the engine. Returns the ticket of the sent
    /// move as it stands once the engine call has returned.
    pub fn pointer_up(&mut self, id: PieceId) -> Result<Option<MoveTicket>, FrontendError> {
        if self.is_halted() {
            return Ok(None);
        }
        let request = match self.renderer.view_mut(id) {
            Some(view) => self.drag.release(view, &mut self.surface),
            None => None,
        };
        match request {
            Some(request) => self.submit(request).map(Some),
            None => Ok(None),
        }
    }

    /// Sends a move to the engine without going through a drag.
    pub fn submit(&mut self, request: MoveRequest) -> Result<MoveTicket, FrontendError> {
        self.ensure_running()?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending = Some(MoveTicket {
            seq,
            request,
            settled: false,
        });
        tracing::info!(seq, %request, "submitting move");

        let events = match self.bridge.invoke_attempt_move(
            request.from,
            request.to,
            request.promotion,
        ) {
            Ok(events) => events,
            Err(e) => return Err(self.fail(e)),
        };
        self.dispatch(events)?;
        Ok(self.pending.unwrap_or(MoveTicket {
            seq,
            request,
            settled: false,
        }))
    }

    fn dispatch(&mut self, events: Vec<EngineEvent>) -> Result<(), FrontendError> {
        for event in events {
            match event {
                EngineEvent::Log(text) => self.sink.log(&text),
                EngineEvent::Status(text) => self.status.set(text),
                EngineEvent::Redraw => {
                    if let Some(ticket) = self.pending.as_mut() {
                        ticket.settled = true;
                    }
                    self.redraw()?;
                }
                EngineEvent::Fatal(message) => {
                    self.halt(message.clone());
                    return Err(FrontendError::Halted(message));
                }
            }
        }
        Ok(())
    }

    fn fail(&mut self, error: EngineError) -> FrontendError {
        self.halt(error.to_string());
        FrontendError::Engine(error)
    }

    fn halt(&mut self, message: String) {
        if self.is_halted() {
            return;
        }
        tracing::error!(%message, "engine halted");
        self.drag.cancel();
        self.surface.show_fatal(&message);
        self.phase = Phase::Halted(message);
    }

    fn ensure_running(&self) -> Result<(), FrontendError> {
        match &self.phase {
            Phase::Running => Ok(()),
            Phase::Halted(message) => Err(FrontendError::Halted(message.clone())),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.phase, Phase::Halted(_))
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.viewport.metrics()
    }

    pub fn pieces(&self) -> &[PieceView] {
        self.renderer.views()
    }

    /// The piece being dragged, if any.
    pub fn dragging(&self) -> Option<PieceId> {
        self.drag.active()
    }

    /// The last submitted move and whether the engine has answered it.
    pub fn pending_move(&self) -> Option<&MoveTicket> {
        self.pending.as_ref()
    }

    /// Number of completed redraws.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
