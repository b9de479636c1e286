//! Sparse JSON encoding
//!
//! Only pixels that differ from the background are listed, which keeps
//! mostly-white answer sheets small.
//!
//! # Format
//!
//! ```text
//! {"format":"sparse","width":W,"height":H,"dpi":D,"background":B,
//!  "pixels":[[x,y,v],...]}
//! ```
//!
//! Pixels are listed in row-major order. `dpi` and `background` default
//! to 300 and 255 when absent.

use crate::{IoError, IoResult, checked_area};
use serde::{Deserialize, Serialize};
use sheetscan_core::{Canvas, CanvasMut, DEFAULT_BACKGROUND, DEFAULT_DPI};
use std::io::Write;

/// Value of the `format` tag.
pub const SPARSE_TAG: &str = "sparse";

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

fn default_background() -> u8 {
    DEFAULT_BACKGROUND
}

#[derive(Debug, Serialize, Deserialize)]
struct SparseImage {
    format: String,
    width: u32,
    height: u32,
    #[serde(default = "default_dpi")]
    dpi: u32,
    #[serde(default = "default_background")]
    background: u8,
    pixels: Vec<(u32, u32, u8)>,
}

/// Write a canvas as sparse JSON.
pub fn write_sparse<W: Write>(canvas: &Canvas, writer: W) -> IoResult<()> {
    let w = canvas.width() as usize;
    let bg = canvas.background();
    let pixels = canvas
        .data()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != bg)
        .map(|(i, &v)| ((i % w) as u32, (i / w) as u32, v))
        .collect();

    let doc = SparseImage {
        format: SPARSE_TAG.to_string(),
        width: canvas.width(),
        height: canvas.height(),
        dpi: canvas.dpi(),
        background: bg,
        pixels,
    };
    serde_json::to_writer(writer, &doc).map_err(|e| IoError::EncodeError(e.to_string()))
}

/// Read a canvas from sparse JSON.
///
/// # Errors
///
/// Returns [`IoError::MalformedImage`] if the JSON does not parse, the
/// format tag is wrong, a dimension or the resolution is zero, the area
/// exceeds [`MAX_PIXELS`](crate::MAX_PIXELS), a value does not fit in a
/// byte, or a coordinate is outside the canvas or listed twice.
pub fn read_sparse(data: &[u8]) -> IoResult<Canvas> {
    let doc: SparseImage =
        serde_json::from_slice(data).map_err(|e| IoError::MalformedImage(e.to_string()))?;

    if doc.format != SPARSE_TAG {
        return Err(IoError::MalformedImage(format!(
            "format tag '{}', expected '{SPARSE_TAG}'",
            doc.format
        )));
    }
    let area = checked_area(doc.width, doc.height)?;
    if doc.pixels.len() > area {
        return Err(IoError::MalformedImage(format!(
            "{} pixels listed for a {}x{} canvas",
            doc.pixels.len(),
            doc.width,
            doc.height
        )));
    }
    if doc.dpi == 0 {
        return Err(IoError::MalformedImage("dpi must be positive".into()));
    }

    let mut canvas = CanvasMut::new(doc.width, doc.height, doc.background)?;
    canvas.set_dpi(doc.dpi)?;
    let mut seen = vec![false; area];

    for &(x, y, v) in &doc.pixels {
        if x >= doc.width || y >= doc.height {
            return Err(IoError::MalformedImage(format!(
                "pixel ({x}, {y}) outside {}x{}",
                doc.width, doc.height
            )));
        }
        let idx = y as usize * doc.width as usize + x as usize;
        if std::mem::replace(&mut seen[idx], true) {
            return Err(IoError::MalformedImage(format!(
                "pixel ({x}, {y}) listed twice"
            )));
        }
        canvas.set_unchecked(x, y, v);
    }

    Ok(canvas.into())
}
