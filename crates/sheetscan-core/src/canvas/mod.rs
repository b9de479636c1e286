//! Canvas - The grayscale raster container
//!
//! A `Canvas` holds one 8-bit intensity per pixel (0 = black, 255 = white)
//! plus the resolution and background intensity that the codecs carry
//! in-band.
//!
//! # Pixel layout
//!
//! - One byte per pixel, rows stored top to bottom
//! - No row padding; the pixel at (x, y) is at `y * width + x`
//!
//! # Ownership model
//!
//! `Canvas` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `CanvasMut` via [`Canvas::try_into_mut`]
//! or [`Canvas::to_mut`], then convert back with `Into<Canvas>`.

mod access;
pub mod graphics;
mod integral;

pub use integral::DarkIntegral;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Default resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Default background intensity (white).
pub const DEFAULT_BACKGROUND: u8 = 255;

/// Internal canvas data
#[derive(Debug, Clone, PartialEq, Eq)]
struct CanvasData {
    width: u32,
    height: u32,
    dpi: u32,
    background: u8,
    data: Vec<u8>,
}

impl CanvasData {
    fn new(width: u32, height: u32, background: u8) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n > 0 && n <= isize::MAX as usize)
            .ok_or(Error::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            dpi: DEFAULT_DPI,
            background,
            data: vec![background; len],
        })
    }
}

/// Immutable grayscale canvas
///
/// Cloning a `Canvas` is cheap: the pixel buffer is shared. Two canvases
/// compare equal when their dimensions, resolution, background and every
/// pixel match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    inner: Arc<CanvasData>,
}

impl Canvas {
    /// Create a new canvas filled with the background intensity.
    ///
    /// The resolution starts at [`DEFAULT_DPI`].
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (must be > 0)
    /// * `height` - Height in pixels (must be > 0)
    /// * `background` - Intensity every pixel starts at
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero or
    /// the pixel count does not fit in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use sheetscan_core::Canvas;
    ///
    /// let canvas = Canvas::new(64, 32, 255).unwrap();
    /// assert_eq!(canvas.width(), 64);
    /// assert_eq!(canvas.get(10, 10).unwrap(), 255);
    /// ```
    pub fn new(width: u32, height: u32, background: u8) -> Result<Self> {
        Ok(Canvas {
            inner: Arc::new(CanvasData::new(width, height, background)?),
        })
    }

    /// Get the canvas width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the canvas height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the resolution in dots per inch.
    #[inline]
    pub fn dpi(&self) -> u32 {
        self.inner.dpi
    }

    /// Get the background intensity.
    #[inline]
    pub fn background(&self) -> u8 {
        self.inner.background
    }

    /// Get the raw pixel buffer (row-major).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Try to get mutable access without copying.
    ///
    /// Succeeds only when this is the sole reference; otherwise the
    /// canvas is handed back unchanged.
    pub fn try_into_mut(self) -> std::result::Result<CanvasMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(CanvasMut { inner: data }),
            Err(arc) => Err(Canvas { inner: arc }),
        }
    }

    /// Create a mutable copy of this canvas.
    pub fn to_mut(&self) -> CanvasMut {
        CanvasMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Create a new mutable canvas with the same geometry and resolution,
    /// filled with the background intensity.
    pub fn create_template(&self) -> CanvasMut {
        CanvasMut {
            inner: CanvasData {
                width: self.inner.width,
                height: self.inner.height,
                dpi: self.inner.dpi,
                background: self.inner.background,
                data: vec![self.inner.background; self.inner.data.len()],
            },
        }
    }
}

/// Mutable grayscale canvas
///
/// Owned exclusively by whichever operation is drawing into it. Convert
/// into a [`Canvas`] with `Into` once finished.
#[derive(Debug)]
pub struct CanvasMut {
    inner: CanvasData,
}

impl CanvasMut {
    /// Create a new mutable canvas filled with the background intensity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32, background: u8) -> Result<Self> {
        Ok(CanvasMut {
            inner: CanvasData::new(width, height, background)?,
        })
    }

    /// Get the canvas width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the canvas height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the resolution in dots per inch.
    #[inline]
    pub fn dpi(&self) -> u32 {
        self.inner.dpi
    }

    /// Set the resolution in dots per inch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `dpi` is zero.
    pub fn set_dpi(&mut self, dpi: u32) -> Result<()> {
        if dpi == 0 {
            return Err(Error::InvalidParameter("dpi must be positive".into()));
        }
        self.inner.dpi = dpi;
        Ok(())
    }

    /// Get the background intensity.
    #[inline]
    pub fn background(&self) -> u8 {
        self.inner.background
    }

    /// Get the raw pixel buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the raw pixel buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u8) {
        self.inner.data.fill(value);
    }
}

impl From<CanvasMut> for Canvas {
    fn from(canvas_mut: CanvasMut) -> Self {
        Canvas {
            inner: Arc::new(canvas_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new(100, 200, 255).unwrap();
        assert_eq!(canvas.width(), 100);
        assert_eq!(canvas.height(), 200);
        assert_eq!(canvas.dpi(), DEFAULT_DPI);
        assert_eq!(canvas.background(), 255);
        assert_eq!(canvas.data().len(), 20_000);
        assert!(canvas.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_canvas_creation_invalid() {
        assert!(Canvas::new(0, 100, 255).is_err());
        assert!(Canvas::new(100, 0, 255).is_err());
        assert!(matches!(
            CanvasMut::new(u32::MAX, u32::MAX, 255),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_canvas_clone_shares_data() {
        let c1 = Canvas::new(10, 10, 0).unwrap();
        let c2 = c1.clone();
        assert_eq!(c1.data().as_ptr(), c2.data().as_ptr());
    }

    #[test]
    fn test_try_into_mut() {
        let c1 = Canvas::new(10, 10, 255).unwrap();
        let c2 = c1.clone();
        let c1 = c1.try_into_mut().unwrap_err();
        drop(c2);
        let mut cm = c1.try_into_mut().unwrap();
        cm.set(3, 4, 7).unwrap();
        let c: Canvas = cm.into();
        assert_eq!(c.get(3, 4).unwrap(), 7);
    }

    #[test]
    fn test_equality_includes_metadata() {
        let a = Canvas::new(4, 4, 255).unwrap();
        let mut bm = a.to_mut();
        assert_eq!(a, Canvas::from(a.to_mut()));
        bm.set_dpi(150).unwrap();
        assert_ne!(a, Canvas::from(bm));
    }

    #[test]
    fn test_create_template() {
        let mut cm = CanvasMut::new(5, 5, 200).unwrap();
        cm.set_dpi(72).unwrap();
        cm.set(0, 0, 0).unwrap();
        let c: Canvas = cm.into();
        let t: Canvas = c.create_template().into();
        assert_eq!(t.dpi(), 72);
        assert_eq!(t.get(0, 0).unwrap(), 200);
    }
}
