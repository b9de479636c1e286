//! Error type of the facade

use thiserror::Error;

/// Any error raised by one of the entry points
#[derive(Debug, Error)]
pub enum Error {
    /// Layout or canvas error
    #[error(transparent)]
    Core(#[from] sheetscan_core::Error),

    /// Encoding or decoding error
    #[error(transparent)]
    Io(#[from] sheetscan_io::IoError),

    /// Synthesis error
    #[error(transparent)]
    Synth(#[from] sheetscan_synth::SynthError),

    /// Extraction error
    #[error(transparent)]
    Recog(#[from] sheetscan_recog::RecogError),
}

/// Result type of the entry points
pub type Result<T> = std::result::Result<T, Error>;
