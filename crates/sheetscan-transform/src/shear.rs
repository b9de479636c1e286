//! Horizontal shear (skew)
//!
//! Row `y` is shifted right by `round(shear * (y - yc))` pixels, where
//! `yc` is the center row. The center row is invariant; rows below it
//! move right for positive factors and rows above move left.

use crate::{TransformError, TransformResult};
use sheetscan_core::Canvas;

/// Shear a canvas horizontally about its center row.
///
/// # Arguments
///
/// * `canvas` - Input canvas
/// * `shear` - Horizontal displacement per row of vertical offset
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `shear` is not
/// finite.
pub fn skew(canvas: &Canvas, shear: f64) -> TransformResult<Canvas> {
    if !shear.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "shear factor {shear}"
        )));
    }
    if shear == 0.0 {
        return Ok(canvas.clone());
    }

    let w = canvas.width() as i64;
    let h = canvas.height();
    let yc = (h as f64 - 1.0) / 2.0;

    let mut out = canvas.create_template();
    for y in 0..h {
        // Any shift past the width leaves the row blank
        let shift = ((shear * (y as f64 - yc)).round() as i64).clamp(-w, w);
        for x in 0..w {
            // Pixels shifted in from outside keep the background
            if let Some(v) = canvas.pixel_at(x - shift, y as i64) {
                out.set_unchecked(x as u32, y, v);
            }
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetscan_core::CanvasMut;

    fn column_canvas() -> Canvas {
        // 31x21 with a vertical black line at x = 15
        let mut cm = CanvasMut::new(31, 21, 255).unwrap();
        for y in 0..21 {
            cm.set(15, y, 0).unwrap();
        }
        cm.into()
    }

    #[test]
    fn test_zero_shear_is_identity() {
        let c = column_canvas();
        assert_eq!(skew(&c, 0.0).unwrap(), c);
    }

    #[test]
    fn test_center_row_invariant() {
        let c = column_canvas();
        let s = skew(&c, 0.5).unwrap();
        assert_eq!(s.get(15, 10).unwrap(), 0);
        // bottom row: offset 10 -> shift 5 to the right
        assert_eq!(s.get(20, 20).unwrap(), 0);
        assert_eq!(s.get(15, 20).unwrap(), 255);
        // top row shifts left
        assert_eq!(s.get(10, 0).unwrap(), 0);
    }

    #[test]
    fn test_negative_shear() {
        let c = column_canvas();
        let s = skew(&c, -0.2).unwrap();
        assert_eq!(s.get(13, 20).unwrap(), 0);
        assert_eq!(s.get(17, 0).unwrap(), 0);
    }

    #[test]
    fn test_huge_shear_keeps_center_row() {
        let c = column_canvas();
        for shear in [1e30, -1e30] {
            let s = skew(&c, shear).unwrap();
            assert_eq!(s.get(15, 10).unwrap(), 0);
            assert_eq!(s.data().iter().filter(|&&v| v == 0).count(), 1);
        }
    }

    #[test]
    fn test_invalid_shear() {
        let c = column_canvas();
        assert!(skew(&c, f64::INFINITY).is_err());
    }
}
