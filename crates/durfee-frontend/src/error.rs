//! Error types for the frontend.

use thiserror::Error;

/// Errors raised while talking to the engine module.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The module could not be fetched or instantiated.
    #[error("failed to load engine module: {0}")]
    ModuleLoad(String),

    /// The instantiated module lacks a required export.
    #[error("engine module does not export `{0}`")]
    MissingExport(&'static str),

    /// A read reached past the end of engine memory.
    #[error("read of {len} bytes at offset {offset} exceeds engine memory of {memory} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        memory: usize,
    },

    /// No zero terminator within the permitted string length.
    #[error("engine string at offset {offset} is not terminated within {max} bytes")]
    Unterminated { offset: usize, max: usize },

    /// An entry point threw instead of returning.
    #[error("engine trapped: {0}")]
    Trap(String),
}

/// Errors raised while loading or validating [`FrontendConfig`](crate::FrontendConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by [`Frontend`](crate::Frontend) operations.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine signalled a fatal error; interaction is over.
    #[error("engine halted: {0}")]
    Halted(String),
}
