//! sheetscan-io - Canvas codecs
//!
//! Two lossless encodings for grayscale canvases, both carrying width,
//! height, resolution and background in-band:
//!
//! - [`ImageFormat::Sparse`]: JSON listing only non-background pixels
//! - [`ImageFormat::Pgm`]: plain-text graymap (`P2`), one value per pixel
//!
//! For every canvas `c` and format `f`,
//! `decode(&encode(&c, f)?, f)? == c`.

mod error;
mod format;
pub mod pgm;
pub mod sparse;

pub use error::{IoError, IoResult};
pub use format::ImageFormat;

use sheetscan_core::Canvas;
use std::path::Path;
use tracing::{debug, warn};

/// Largest canvas either decoder accepts, in pixels.
///
/// An A3 page at 600 dpi is about 70 million pixels.
pub const MAX_PIXELS: usize = 1 << 28;

/// Pixel count of a declared size, rejecting empty or oversized canvases.
pub(crate) fn checked_area(width: u32, height: u32) -> IoResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n > 0 && n <= MAX_PIXELS)
        .ok_or_else(|| IoError::MalformedImage(format!("invalid dimensions {width}x{height}")))
}

/// Encode a canvas into bytes.
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] if serialization fails.
pub fn encode(canvas: &Canvas, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Sparse => sparse::write_sparse(canvas, &mut out)?,
        ImageFormat::Pgm => pgm::write_pgm(canvas, &mut out)?,
    }
    debug!(
        ?format,
        width = canvas.width(),
        height = canvas.height(),
        bytes = out.len(),
        "encoded canvas"
    );
    Ok(out)
}

/// Decode bytes produced by [`encode`] (or any conforming writer).
///
/// # Errors
///
/// Returns [`IoError::MalformedImage`] on a header mismatch, a
/// non-numeric token, or a pixel count that disagrees with the declared
/// dimensions.
pub fn decode(data: &[u8], format: ImageFormat) -> IoResult<Canvas> {
    let result = match format {
        ImageFormat::Sparse => sparse::read_sparse(data),
        ImageFormat::Pgm => pgm::read_pgm(data),
    };
    match &result {
        Ok(canvas) => debug!(
            ?format,
            width = canvas.width(),
            height = canvas.height(),
            "decoded canvas"
        ),
        Err(e) => warn!(?format, error = %e, "decode failed"),
    }
    result
}

/// Read a canvas from a file, choosing the codec from the extension.
pub fn read_canvas<P: AsRef<Path>>(path: P) -> IoResult<Canvas> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    decode(&data, format)
}

/// Write a canvas to a file in the given format.
pub fn write_canvas<P: AsRef<Path>>(canvas: &Canvas, path: P, format: ImageFormat) -> IoResult<()> {
    let data = encode(canvas, format)?;
    std::fs::write(path, data)?;
    Ok(())
}
