//! Error types for grid construction, conversion, filters and the worker.

use thiserror::Error;

/// Failure raised by grid construction, buffer conversion or a filter.
///
/// Every variant is detected before any output grid is produced, so a caller
/// never receives a partially transformed image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Out of bounds: ({x}, {y}) + {width}x{height} exceeds {grid_width}x{grid_height}")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    #[error("Invalid argument {position}: {reason}")]
    InvalidArgument { position: usize, reason: String },
}

impl FilterError {
    /// Stable name of the variant, used in serialized error replies.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::InvalidDimension { .. } => "InvalidDimension",
            FilterError::BufferSizeMismatch { .. } => "BufferSizeMismatch",
            FilterError::OutOfBounds { .. } => "OutOfBounds",
            FilterError::UnsupportedOperation(_) => "UnsupportedOperation",
            FilterError::InvalidColorFormat(_) => "InvalidColorFormat",
            FilterError::InvalidArgument { .. } => "InvalidArgument",
        }
    }
}

/// Failure at the worker message boundary.
///
/// `UnknownFilter` is kept apart from [`WorkerError::Filter`] so a caller can
/// tell a bad selector from a bad parameter.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Unknown filter: {0:?}")]
    UnknownFilter(String),

    #[error("Filter {selector:?} failed: {source}")]
    Filter {
        selector: String,
        #[source]
        source: FilterError,
    },

    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("Filter {selector:?} panicked: {message}")]
    Panicked { selector: String, message: String },

    #[error("Worker disconnected")]
    Disconnected,
}

impl WorkerError {
    /// Stable name of the variant; filter failures report the inner kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::UnknownFilter(_) => "UnknownFilter",
            WorkerError::Filter { source, .. } => source.kind(),
            WorkerError::MalformedMessage(_) => "MalformedMessage",
            WorkerError::Panicked { .. } => "Panicked",
            WorkerError::Disconnected => "Disconnected",
        }
    }
}
