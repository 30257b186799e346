use thiserror::Error;

/// Error type that captures the failures an analysis invocation can surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input data. Fatal to the invocation that saw it;
    /// no partial result is produced.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A model prediction was requested before any model was trained.
    /// Recoverable: callers fall back to the linear forecast or train first.
    #[error("no trained spending model is available")]
    ModelUnavailable,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
