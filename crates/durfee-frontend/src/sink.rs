//! Destination for the engine's advisory log messages.

/// Receives engine log lines. Implementations must not fail or block.
pub trait LogSink {
    fn log(&mut self, text: &str);
}

/// Forwards engine log lines to `tracing` under the `engine` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, text: &str) {
        tracing::info!(target: "engine", "{}", text);
    }
}

impl<F: FnMut(&str)> LogSink for F {
    fn log(&mut self, text: &str) {
        self(text)
    }
}
