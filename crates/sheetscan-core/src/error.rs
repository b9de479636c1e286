//! Error types for sheetscan-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// sheetscan-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid canvas dimensions
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel access outside the canvas
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} canvas")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structurally invalid layout or answer key
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sheetscan-core operations
pub type Result<T> = std::result::Result<T, Error>;
