//! Pixel access functions
//!
//! Bounds-checked `get`/`set` for contract-level access, unchecked
//! variants for inner loops, and signed-coordinate lookups for samplers
//! that may wander off the canvas.

use super::{Canvas, CanvasMut};
use crate::error::{Error, Result};

#[inline]
fn index_of(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[inline]
fn signed_index(width: u32, height: u32, x: i64, y: i64) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        None
    } else {
        Some(y as usize * width as usize + x as usize)
    }
}

fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Error {
    Error::OutOfBounds {
        x,
        y,
        width,
        height,
    }
}

impl Canvas {
    /// Get the intensity at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates lie outside the
    /// canvas.
    pub fn get(&self, x: u32, y: u32) -> Result<u8> {
        if x >= self.width() || y >= self.height() {
            return Err(out_of_bounds(x, y, self.width(), self.height()));
        }
        Ok(self.get_unchecked(x, y))
    }

    /// Get the intensity without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data()[index_of(self.width(), x, y)]
    }

    /// Look up a pixel by signed coordinates.
    ///
    /// Returns `None` outside the canvas.
    #[inline]
    pub fn pixel_at(&self, x: i64, y: i64) -> Option<u8> {
        signed_index(self.width(), self.height(), x, y).map(|i| self.data()[i])
    }
}

impl CanvasMut {
    /// Get the intensity at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates lie outside the
    /// canvas.
    pub fn get(&self, x: u32, y: u32) -> Result<u8> {
        if x >= self.width() || y >= self.height() {
            return Err(out_of_bounds(x, y, self.width(), self.height()));
        }
        Ok(self.data()[index_of(self.width(), x, y)])
    }

    /// Set the intensity at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates lie outside the
    /// canvas.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(out_of_bounds(x, y, self.width(), self.height()));
        }
        self.set_unchecked(x, y, value);
        Ok(())
    }

    /// Set the intensity without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: u8) {
        let idx = index_of(self.width(), x, y);
        self.data_mut()[idx] = value;
    }

    /// Set a pixel by signed coordinates, silently clipping to the canvas.
    ///
    /// Returns `true` if the pixel was inside and got written.
    #[inline]
    pub fn set_clipped(&mut self, x: i64, y: i64, value: u8) -> bool {
        match signed_index(self.width(), self.height(), x, y) {
            Some(i) => {
                self.data_mut()[i] = value;
                true
            }
            None => false,
        }
    }
}
