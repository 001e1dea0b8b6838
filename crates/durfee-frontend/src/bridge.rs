//! Connection to the externally compiled engine.
//!
//! The engine exposes a linear memory, two mutating entry points and the
//! offset of its board buffer. It talks back through imported callbacks that
//! fire while an entry point is running. Those callbacks decode their string
//! argument on the spot and queue an [`EngineEvent`] on the shared
//! [`EngineCallbacks`]; the bridge hands the queued events to the caller once
//! the entry point has returned, so no callback ever runs while the caller
//! holds a borrow of the view state.
//!
//! The engine only executes inside an entry point (or its start function
//! during instantiation), so nothing can be queued between calls except
//! what instantiation left behind; the next entry point call picks that up.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use durfee_core::{PieceCode, PromotionHint, Square};

use crate::EngineError;

/// Read access to the engine's linear memory.
pub trait LinearMemory {
    /// Current size of the memory in bytes.
    fn size(&self) -> usize;

    /// Reads `len` bytes at `offset`.
    ///
    /// Each call observes the memory as it is now; implementations must not
    /// hand out bytes cached from an earlier call.
    fn read(&self, offset: usize, len: usize) -> Result<Cow<'_, [u8]>, EngineError>;
}

/// The entry points of an instantiated engine module.
pub trait EngineModule {
    type Memory: LinearMemory;

    /// The engine's exported memory.
    fn memory(&self) -> &Self::Memory;

    /// Offset of the board buffer inside [`memory`](Self::memory).
    fn board_offset(&self) -> usize;

    /// Sets up a new game. The engine reports back through callbacks.
    fn init_game(&mut self) -> Result<(), EngineError>;

    /// Asks the engine to play `from` -> `to`. The engine alone decides
    /// whether the move is legal.
    fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: PromotionHint,
    ) -> Result<(), EngineError>;
}

/// A decoded engine callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Advisory diagnostic text.
    Log(String),
    /// Replacement status line.
    Status(String),
    /// The board buffer changed.
    Redraw,
    /// Unrecoverable engine error.
    Fatal(String),
}

/// Receiving end of the engine's imported callbacks.
///
/// Clones share one FIFO: the imports hold one clone and the bridge another.
/// String arguments are read from engine memory while the callback runs,
/// since the engine may reuse the buffer as soon as it returns.
#[derive(Debug, Clone)]
pub struct EngineCallbacks {
    events: Rc<RefCell<VecDeque<EngineEvent>>>,
    max_string_len: usize,
}

impl EngineCallbacks {
    /// `max_string_len` bounds the scan for a string terminator.
    pub fn new(max_string_len: usize) -> Self {
        EngineCallbacks {
            events: Rc::default(),
            max_string_len,
        }
    }

    /// `console_log(text)`. An undecodable message is dropped with a warning.
    pub fn log<M: LinearMemory + ?Sized>(&self, memory: &M, offset: usize) {
        match read_cstring(memory, offset, self.max_string_len) {
            Ok(text) => self.push(EngineEvent::Log(text)),
            Err(e) => tracing::warn!(error = %e, "dropping undecodable engine log message"),
        }
    }

    /// `set_status_msg(text)`. An undecodable message is dropped with a
    /// warning and the previous status stays.
    pub fn set_status<M: LinearMemory + ?Sized>(&self, memory: &M, offset: usize) {
        match read_cstring(memory, offset, self.max_string_len) {
            Ok(text) => self.push(EngineEvent::Status(text)),
            Err(e) => tracing::warn!(error = %e, "dropping undecodable engine status message"),
        }
    }

    /// `redraw()`.
    pub fn redraw(&self) {
        self.push(EngineEvent::Redraw);
    }

    /// `fatal(text)`. Always queues a fatal event, with a placeholder when
    /// the message itself cannot be read.
    pub fn fatal<M: LinearMemory + ?Sized>(&self, memory: &M, offset: usize) {
        let message = read_cstring(memory, offset, self.max_string_len)
            .unwrap_or_else(|e| format!("unreadable fatal message ({})", e));
        self.push(EngineEvent::Fatal(message));
    }

    fn push(&self, event: EngineEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Removes and returns every queued event in arrival order.
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Decodes a zero-terminated string at `offset`.
///
/// Each byte is one character code (no multi-byte decoding). The scan stops
/// at the first zero byte; if none appears within `max_len` bytes, or the
/// memory ends first, the string is rejected.
pub fn read_cstring<M: LinearMemory + ?Sized>(
    memory: &M,
    offset: usize,
    max_len: usize,
) -> Result<String, EngineError> {
    const CHUNK: usize = 64;

    let size = memory.size();
    if offset >= size {
        return Err(EngineError::OutOfBounds {
            offset,
            len: 1,
            memory: size,
        });
    }

    let mut text = String::new();
    let mut pos = offset;
    // The terminator itself must fall inside the first `max_len + 1` bytes.
    let limit = offset.saturating_add(max_len).saturating_add(1).min(size);
    while pos < limit {
        let len = CHUNK.min(limit - pos);
        let bytes = memory.read(pos, len)?;
        match bytes.iter().position(|&b| b == 0) {
            Some(end) => {
                text.extend(bytes[..end].iter().map(|&b| char::from(b)));
                return Ok(text);
            }
            None => text.extend(bytes.iter().map(|&b| char::from(b))),
        }
        pos += len;
    }
    Err(EngineError::Unterminated {
        offset,
        max: max_len,
    })
}

/// A fresh read of the board buffer.
///
/// Borrowed straight from engine memory where the platform allows it,
/// otherwise a copy taken at construction. Either way it is dropped at the
/// end of the redraw that made it.
#[derive(Debug)]
pub struct BoardView<'a> {
    bytes: Cow<'a, [u8]>,
    board_size: u8,
}

impl<'a> BoardView<'a> {
    /// Wraps `bytes`, which must hold exactly `board_size²` squares.
    pub fn new(bytes: Cow<'a, [u8]>, board_size: u8) -> Self {
        debug_assert_eq!(
            bytes.len(),
            usize::from(board_size) * usize::from(board_size)
        );
        BoardView { bytes, board_size }
    }

    /// Iterates every square in row-major order with its code.
    pub fn squares(&self) -> impl Iterator<Item = (Square, PieceCode)> + '_ {
        self.bytes.iter().enumerate().filter_map(move |(i, &b)| {
            Square::from_index(i, self.board_size).map(|sq| (sq, PieceCode::new(b)))
        })
    }

    /// Number of non-empty squares.
    pub fn occupied(&self) -> usize {
        self.bytes
            .iter()
            .filter(|&&b| !PieceCode::new(b).is_empty())
            .count()
    }
}

/// Owns the engine module and translates between it and the view layer.
///
/// Holds no game state of its own: everything it knows is re-read from
/// engine memory on demand.
pub struct EngineBridge<M> {
    module: M,
    callbacks: EngineCallbacks,
}

impl<M: EngineModule> EngineBridge<M> {
    /// Wraps an instantiated module. `callbacks` must be shared with its
    /// imports.
    pub fn new(module: M, callbacks: EngineCallbacks) -> Self {
        EngineBridge { module, callbacks }
    }

    /// Reads the board buffer as it is right now.
    pub fn read_board_view(&self, board_size: u8) -> Result<BoardView<'_>, EngineError> {
        let len = usize::from(board_size) * usize::from(board_size);
        let bytes = self.module.memory().read(self.module.board_offset(), len)?;
        if bytes.len() != len {
            return Err(EngineError::OutOfBounds {
                offset: self.module.board_offset(),
                len,
                memory: self.module.memory().size(),
            });
        }
        Ok(BoardView::new(bytes, board_size))
    }

    /// Calls the engine's `init_game` and returns the callbacks it fired.
    pub fn invoke_init(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        tracing::debug!("invoking engine init");
        let result = self.module.init_game();
        let events = self.callbacks.drain();
        result.map(|()| events)
    }

    /// Calls the engine's `attempt_move` and returns the callbacks it fired.
    pub fn invoke_attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: PromotionHint,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        tracing::debug!(%from, %to, promotion = %promotion.to_char(), "invoking engine move");
        let result = self.module.attempt_move(from, to, promotion);
        let events = self.callbacks.drain();
        result.map(|()| events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bytes(Vec<u8>);

    impl LinearMemory for Bytes {
        fn size(&self) -> usize {
            self.0.len()
        }

        fn read(&self, offset: usize, len: usize) -> Result<Cow<'_, [u8]>, EngineError> {
            self.0
                .get(offset..offset + len)
                .map(Cow::Borrowed)
                .ok_or(EngineError::OutOfBounds {
                    offset,
                    len,
                    memory: self.0.len(),
                })
        }
    }

    fn memory_with(offset: usize, text: &[u8], size: usize) -> Bytes {
        let mut bytes = vec![b'x'; size];
        bytes[offset..offset + text.len()].copy_from_slice(text);
        Bytes(bytes)
    }

    #[test]
    fn reads_terminated_string() {
        let mem = memory_with(10, b"Your turn...\0", 64);
        assert_eq!(read_cstring(&mem, 10, 100).unwrap(), "Your turn...");
    }

    #[test]
    fn empty_string() {
        let mem = memory_with(3, b"\0", 8);
        assert_eq!(read_cstring(&mem, 3, 100).unwrap(), "");
    }

    #[test]
    fn bytes_map_to_single_chars() {
        let mem = memory_with(0, &[0x41, 0xE9, 0x7F, 0], 8);
        assert_eq!(read_cstring(&mem, 0, 16).unwrap(), "A\u{e9}\u{7f}");
    }

    #[test]
    fn string_spanning_chunks() {
        let long = vec![b'a'; 150];
        let mut text = long.clone();
        text.push(0);
        let mem = memory_with(5, &text, 400);
        assert_eq!(read_cstring(&mem, 5, 200).unwrap().len(), 150);
    }

    #[test]
    fn terminator_exactly_at_limit() {
        let mem = memory_with(0, b"abcd\0", 16);
        assert_eq!(read_cstring(&mem, 0, 4).unwrap(), "abcd");
        assert_eq!(
            read_cstring(&mem, 0, 3),
            Err(EngineError::Unterminated { offset: 0, max: 3 })
        );
    }

    #[test]
    fn missing_terminator_is_bounded() {
        let mem = Bytes(vec![b'z'; 1024]);
        assert_eq!(
            read_cstring(&mem, 0, 100),
            Err(EngineError::Unterminated { offset: 0, max: 100 })
        );
    }

    #[test]
    fn memory_ends_before_terminator() {
        let mem = Bytes(b"abc".to_vec());
        assert_eq!(
            read_cstring(&mem, 0, 100),
            Err(EngineError::Unterminated { offset: 0, max: 100 })
        );
    }

    #[test]
    fn offset_past_memory() {
        let mem = Bytes(vec![0; 4]);
        assert!(matches!(
            read_cstring(&mem, 4, 10),
            Err(EngineError::OutOfBounds { offset: 4, .. })
        ));
    }

    #[test]
    fn board_view_squares() {
        let mut bytes = vec![0xFF; 16];
        bytes[Square::new(1, 2).index(4)] = 0b1001;
        let view = BoardView::new(Cow::Owned(bytes), 4);
        assert_eq!(view.occupied(), 1);
        let occupied: Vec<_> = view.squares().filter(|(_, c)| !c.is_empty()).collect();
        assert_eq!(occupied, vec![(Square::new(1, 2), PieceCode::new(0b1001))]);
    }

    #[test]
    fn callbacks_keep_arrival_order() {
        let mem = memory_with(4, b"Thinking...\0", 32);
        let callbacks = EngineCallbacks::new(64);
        let imports = callbacks.clone();
        imports.set_status(&mem, 4);
        imports.redraw();
        assert_eq!(callbacks.len(), 2);
        assert_eq!(
            callbacks.drain(),
            vec![
                EngineEvent::Status("Thinking...".to_string()),
                EngineEvent::Redraw
            ]
        );
        assert!(callbacks.is_empty());
    }

    #[test]
    fn strings_are_read_when_the_callback_fires() {
        let mut mem = memory_with(0, b"move 1\0", 32);
        let callbacks = EngineCallbacks::new(64);
        callbacks.log(&mem, 0);
        mem.0[..8].copy_from_slice(b"GARBAGE\0");
        assert_eq!(callbacks.drain(), vec![EngineEvent::Log("move 1".to_string())]);
    }

    #[test]
    fn undecodable_log_and_status_are_dropped() {
        let mem = Bytes(vec![b'z'; 64]);
        let callbacks = EngineCallbacks::new(16);
        callbacks.log(&mem, 0);
        callbacks.set_status(&mem, 0);
        callbacks.log(&mem, 100);
        assert!(callbacks.is_empty());
    }

    #[test]
    fn undecodable_fatal_still_reported() {
        let mem = Bytes(vec![b'z'; 64]);
        let callbacks = EngineCallbacks::new(16);
        callbacks.fatal(&mem, 0);
        match callbacks.drain().as_slice() {
            [EngineEvent::Fatal(message)] => {
                assert!(message.starts_with("unreadable fatal message"))
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }
}
