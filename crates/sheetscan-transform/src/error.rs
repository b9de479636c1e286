//! Error types for sheetscan-transform

use thiserror::Error;

/// Errors that can occur during geometric transformations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] sheetscan_core::Error),

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Too few point correspondences for a fit
    #[error("need at least {required} point pairs, got {found}")]
    InsufficientPoints { found: usize, required: usize },

    /// Singular matrix (degenerate point configuration)
    #[error("singular transformation matrix")]
    SingularMatrix,
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
