//! I/O error types
//!
//! Provides a unified error type for both codecs. Structural problems in
//! the input always surface as [`IoError::MalformedImage`]; nothing is
//! partially decoded.

use thiserror::Error;

/// Error type for canvas encoding and decoding.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension does not name a supported format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The encoded data is structurally invalid
    #[error("malformed image: {0}")]
    MalformedImage(String),

    /// The encoder failed to serialize the canvas
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] sheetscan_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
