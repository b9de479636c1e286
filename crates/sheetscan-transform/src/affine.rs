//! Affine point mapping
//!
//! # Affine Matrix
//!
//! An affine transformation can be represented as:
//! ```text
//! | a  b  tx |
//! | c  d  ty |
//! | 0  0  1  |
//! ```
//!
//! The transformation equations are:
//! ```text
//! x' = a*x + b*y + tx
//! y' = c*x + d*y + ty
//! ```
//!
//! [`AffineMatrix::fit`] finds the least-squares mapping between two
//! point sets. With exactly three non-collinear pairs the fit is exact;
//! with more it averages out detection jitter.

use crate::{TransformError, TransformResult};
use sheetscan_core::Point;

/// 2D affine transformation matrix (6 coefficients)
///
/// Represents the transformation:
/// ```text
/// x' = coeffs[0]*x + coeffs[1]*y + coeffs[2]
/// y' = coeffs[3]*x + coeffs[4]*y + coeffs[5]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    /// Coefficients [a, b, tx, c, d, ty]
    coeffs: [f64; 6],
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    /// Minimum number of point pairs for [`AffineMatrix::fit`].
    pub const MIN_POINTS: usize = 3;

    /// Create the identity transformation
    pub fn identity() -> Self {
        Self::from_coeffs([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Create a translation
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_coeffs([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Create from raw coefficients
    pub fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// Get the raw coefficients
    pub fn coeffs(&self) -> &[f64; 6] {
        &self.coeffs
    }

    /// Apply the transformation to a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.coeffs;
        Point::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    /// Determinant of the linear part (area scale factor).
    pub fn determinant(&self) -> f64 {
        self.coeffs[0] * self.coeffs[4] - self.coeffs[1] * self.coeffs[3]
    }

    /// Rotation of the x axis under this mapping, in degrees.
    ///
    /// Positive values are clockwise as displayed (y grows downward).
    pub fn rotation_deg(&self) -> f64 {
        self.coeffs[3].atan2(self.coeffs[0]).to_degrees()
    }

    /// Least-squares affine fit mapping `src[i]` onto `dst[i]`.
    ///
    /// Coordinates are centered on their means before solving the 2x2
    /// normal equations, which keeps the system well conditioned for
    /// page-sized pixel coordinates.
    ///
    /// # Errors
    ///
    /// - [`TransformError::InvalidParameters`] if the slices differ in length
    /// - [`TransformError::InsufficientPoints`] with fewer than 3 pairs
    /// - [`TransformError::SingularMatrix`] if the source points are collinear
    pub fn fit(src: &[Point], dst: &[Point]) -> TransformResult<Self> {
        if src.len() != dst.len() {
            return Err(TransformError::InvalidParameters(format!(
                "{} source points vs {} destination points",
                src.len(),
                dst.len()
            )));
        }
        let n = src.len();
        if n < Self::MIN_POINTS {
            return Err(TransformError::InsufficientPoints {
                found: n,
                required: Self::MIN_POINTS,
            });
        }

        let inv_n = 1.0 / n as f64;
        let mean = |pts: &[Point]| {
            let (sx, sy) = pts.iter().fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
            Point::new(sx * inv_n, sy * inv_n)
        };
        let ms = mean(src);
        let md = mean(dst);

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        let (mut sxu, mut syu, mut sxv, mut syv) = (0.0, 0.0, 0.0, 0.0);
        for (s, d) in src.iter().zip(dst) {
            let x = s.x - ms.x;
            let y = s.y - ms.y;
            let u = d.x - md.x;
            let v = d.y - md.y;
            sxx += x * x;
            sxy += x * y;
            syy += y * y;
            sxu += x * u;
            syu += y * u;
            sxv += x * v;
            syv += y * v;
        }

        let det = sxx * syy - sxy * sxy;
        if det.abs() <= 1e-9 * (sxx * syy).max(f64::MIN_POSITIVE) {
            return Err(TransformError::SingularMatrix);
        }
        let inv = 1.0 / det;
        let a = inv * (syy * sxu - sxy * syu);
        let b = inv * (sxx * syu - sxy * sxu);
        let c = inv * (syy * sxv - sxy * syv);
        let d = inv * (sxx * syv - sxy * sxv);
        let tx = md.x - a * ms.x - b * ms.y;
        let ty = md.y - c * ms.x - d * ms.y;

        Ok(Self::from_coeffs([a, b, tx, c, d, ty]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, q: Point) {
        assert!(p.distance(&q) < 1e-6, "{p:?} vs {q:?}");
    }

    fn corners() -> Vec<Point> {
        vec![
            Point::new(100.0, 100.0),
            Point::new(1600.0, 100.0),
            Point::new(100.0, 1300.0),
            Point::new(1600.0, 1300.0),
        ]
    }

    #[test]
    fn test_fit_recovers_known_mapping() {
        let truth = AffineMatrix::from_coeffs([0.99, -0.05, 12.0, 0.05, 1.01, -7.5]);
        let src = corners();
        let dst: Vec<Point> = src.iter().map(|&p| truth.transform_point(p)).collect();
        let fit = AffineMatrix::fit(&src, &dst).unwrap();
        for (got, want) in fit.coeffs().iter().zip(truth.coeffs()) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_close(fit.transform_point(Point::new(500.0, 700.0)), truth.transform_point(Point::new(500.0, 700.0)));
    }

    #[test]
    fn test_fit_three_points_exact() {
        let src = &corners()[..3];
        let dst: Vec<Point> = src.iter().map(|p| Point::new(p.x + 3.0, p.y - 2.0)).collect();
        let fit = AffineMatrix::fit(src, &dst).unwrap();
        assert_close(fit.transform_point(Point::new(1600.0, 1300.0)), Point::new(1603.0, 1298.0));
        assert!((fit.determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_errors() {
        let pts = corners();
        assert!(matches!(
            AffineMatrix::fit(&pts[..2], &pts[..2]),
            Err(TransformError::InsufficientPoints { found: 2, required: 3 })
        ));
        assert!(AffineMatrix::fit(&pts, &pts[..3]).is_err());
        let line = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        assert!(matches!(
            AffineMatrix::fit(&line, &line),
            Err(TransformError::SingularMatrix)
        ));
    }

    #[test]
    fn test_rotation_angle() {
        let (s, c) = 5f64.to_radians().sin_cos();
        let m = AffineMatrix::from_coeffs([c, -s, 0.0, s, c, 0.0]);
        assert!((m.rotation_deg() - 5.0).abs() < 1e-9);
        assert_eq!(AffineMatrix::identity().rotation_deg(), 0.0);
        assert_eq!(AffineMatrix::translation(2.0, 3.0).transform_point(Point::new(1.0, 1.0)), Point::new(3.0, 4.0));
    }
}
