//! Supported canvas encodings

use crate::{IoError, IoResult};
use std::path::Path;

/// Canvas encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// JSON listing of non-background pixels
    Sparse,
    /// Plain-text graymap (`P2`)
    Pgm,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Sparse => "json",
            Self::Pgm => "pgm",
        }
    }

    /// Pick the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Sparse),
            "pgm" | "pnm" => Some(Self::Pgm),
            _ => None,
        }
    }

    /// Pick the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] for unknown or missing
    /// extensions.
    pub fn from_path(path: &Path) -> IoResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }
}
