//! Rotation about the canvas center
//!
//! Each destination pixel is inverse-mapped into the source and sampled
//! with nearest neighbor. The output has the same size as the input;
//! corners rotated in from outside are filled with the background.

use crate::{TransformError, TransformResult};
use sheetscan_core::Canvas;

/// Angles smaller than this (in degrees) are treated as zero.
const MIN_ANGLE_DEG: f64 = 1e-6;

/// Rotate a canvas about its center.
///
/// Positive angles rotate the content clockwise as displayed (y grows
/// downward).
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if the angle is not
/// finite.
///
/// # Example
///
/// ```
/// use sheetscan_core::Canvas;
/// use sheetscan_transform::rotate;
///
/// let canvas = Canvas::new(40, 30, 255).unwrap();
/// let rotated = rotate(&canvas, 3.0).unwrap();
/// assert_eq!(rotated.width(), 40);
/// ```
pub fn rotate(canvas: &Canvas, angle_deg: f64) -> TransformResult<Canvas> {
    if !angle_deg.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "rotation angle {angle_deg}"
        )));
    }
    if angle_deg.abs() < MIN_ANGLE_DEG {
        return Ok(canvas.clone());
    }

    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    let w = canvas.width();
    let h = canvas.height();
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;

    let mut out = canvas.create_template();
    for dy in 0..h {
        let y_rel = dy as f64 - cy;
        for dx in 0..w {
            let x_rel = dx as f64 - cx;

            // Inverse rotation
            let sx = x_rel * cos_a + y_rel * sin_a + cx;
            let sy = -x_rel * sin_a + y_rel * cos_a + cy;

            if let Some(v) = canvas.pixel_at(sx.round() as i64, sy.round() as i64) {
                out.set_unchecked(dx, dy, v);
            }
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetscan_core::{CanvasMut, Point};

    #[test]
    fn test_zero_angle_is_identity() {
        let mut cm = CanvasMut::new(21, 11, 255).unwrap();
        cm.set(3, 4, 0).unwrap();
        let c: Canvas = cm.into();
        assert_eq!(rotate(&c, 0.0).unwrap(), c);
    }

    #[test]
    fn test_quarter_turn_clockwise() {
        // 21x21 so the center lands on a pixel
        let mut cm = CanvasMut::new(21, 21, 255).unwrap();
        cm.set(15, 10, 0).unwrap(); // right of center
        let c: Canvas = cm.into();
        let r = rotate(&c, 90.0).unwrap();
        assert_eq!(r.get(10, 15).unwrap(), 0); // now below center
        assert_eq!(r.get(15, 10).unwrap(), 255);
    }

    #[test]
    fn test_corners_filled_with_background() {
        let c = Canvas::new(40, 20, 0).unwrap();
        let r = rotate(&c, 30.0).unwrap();
        assert_eq!(r.get(0, 0).unwrap(), 0);
        let mut cm = c.to_mut();
        cm.fill(10);
        let c2: Canvas = cm.into();
        let r2 = rotate(&c2, 30.0).unwrap();
        // background is still 0, so the exposed corner reads 0
        assert_eq!(r2.get(0, 0).unwrap(), 0);
        assert_eq!(r2.get(20, 10).unwrap(), 10);
    }

    #[test]
    fn test_disc_moves_along_arc() {
        let mut cm = CanvasMut::new(101, 101, 255).unwrap();
        cm.fill_disc(Point::new(90.0, 50.0), 3.0, 0);
        let c: Canvas = cm.into();
        let r = rotate(&c, 10.0).unwrap();
        let (s, cs) = 10f64.to_radians().sin_cos();
        let x = (50.0 + 40.0 * cs).round() as u32;
        let y = (50.0 + 40.0 * s).round() as u32;
        assert_eq!(r.get(x, y).unwrap(), 0);
    }

    #[test]
    fn test_invalid_angle() {
        let c = Canvas::new(4, 4, 255).unwrap();
        assert!(rotate(&c, f64::NAN).is_err());
    }
}
