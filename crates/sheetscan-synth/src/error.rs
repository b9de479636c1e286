//! Error types for sheetscan-synth
//!
//! Every variant is detected before any pixel is drawn.

use thiserror::Error;

/// Errors that can occur during sheet synthesis
#[derive(Debug, Error)]
pub enum SynthError {
    /// Core library error (invalid layout, canvas creation)
    #[error("core error: {0}")]
    Core(#[from] sheetscan_core::Error),

    /// Distortion error
    #[error("transform error: {0}")]
    Transform(#[from] sheetscan_transform::TransformError),

    /// The requested or assigned version is not in the question order
    #[error("unknown version: '{0}'")]
    UnknownVersion(String),

    /// A layout question is missing from the version's question order
    #[error("question '{0}' is not in the question order")]
    UnknownQuestion(String),

    /// A choice question has no correct answer in the key
    #[error("question '{0}' has no correct answer")]
    MissingAnswer(String),

    /// The key's correct answer does not name a field of the layout
    #[error("question '{question_id}': answer '{label}' has no answer field")]
    UnknownAnswerLabel { question_id: String, label: String },

    /// An identifier cannot be written into its bubble grid
    #[error("{field} '{value}' does not fit the layout grid")]
    InvalidIdentifier { field: &'static str, value: String },

    /// Invalid synthesis option
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for synthesis operations
pub type SynthResult<T> = Result<T, SynthError>;
