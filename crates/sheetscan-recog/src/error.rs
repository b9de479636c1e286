//! Error types for sheetscan-recog

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] sheetscan_core::Error),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] sheetscan_transform::TransformError),

    /// Invalid parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Too few registration marks were found to rectify the sheet
    #[error("rectification failed: found {found} registration marks, need {required}")]
    RectificationFailure { found: usize, required: usize },

    /// Configuration could not be parsed
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations
pub type RecogResult<T> = Result<T, RecogError>;
