//! Error types for the intyg-core library.
//!
//! Extraction itself never fails on noisy or empty OCR text; a missing field is
//! simply absent from the result. These errors cover caller mistakes and I/O
//! around configuration.

use thiserror::Error;

/// Main error type for the intyg library.
#[derive(Error, Debug)]
pub enum IntygError {
    /// The kind identifier is not one of the registered certificate kinds.
    #[error("unknown certificate kind: {0}")]
    UnknownKind(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the intyg library.
pub type Result<T> = std::result::Result<T, IntygError>;
