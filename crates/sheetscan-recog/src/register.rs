//! Registration mark location and sheet rectification
//!
//! # Algorithm Overview
//!
//! 1. **Dark map**: a [`DarkIntegral`] is built once per canvas so every
//!    box count below is four lookups.
//!
//! 2. **Window scan**: for each mark, every pixel within
//!    `mark_search_tolerance_mm` of its nominal center (a square window)
//!    is scored as a candidate center.
//!
//! 3. **Scoring**: a candidate scores the dark fraction of an inner
//!    square (half-size `0.7 r`) minus the dark fraction of the
//!    surrounding ring between half-sizes `r + 2` and `1.5 r + 2`. A solid
//!    disc of radius `r` scores close to 1; blank paper, lines and large
//!    dark areas score near 0.
//!
//! 4. **Rectification**: with at least `min_marks_required` marks found,
//!    [`AffineMatrix::fit`] maps nominal centers to observed ones. The
//!    fitted matrix carries nominal pixel coordinates onto the canvas,
//!    so readers never resample the image.

use crate::{RecogError, RecogResult, ScanConfig};
use serde::{Deserialize, Serialize};
use sheetscan_core::{Canvas, DarkIntegral, Point, TemplateLayout, mm_to_px};
use sheetscan_transform::AffineMatrix;
use tracing::debug;

// Scoring geometry, relative to the mark radius in pixels
const INNER_FACTOR: f64 = 0.7;
const OUTER_FACTOR: f64 = 1.5;
const RING_GAP_PX: i64 = 2;

/// Candidates within this much of the best score are averaged.
const TIE_EPSILON: f64 = 1e-9;

/// Outcome of searching for one mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkOutcome {
    /// The best candidate passed `mark_min_score`
    Found { position: Point, score: f64 },
    /// No candidate passed; `best_score` is the highest seen
    Missing { best_score: f64 },
}

impl MarkOutcome {
    /// Score of the best candidate, found or not.
    pub fn score(&self) -> f64 {
        match *self {
            MarkOutcome::Found { score, .. } => score,
            MarkOutcome::Missing { best_score } => best_score,
        }
    }
}

/// Search result for one registration mark
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationMark {
    pub id: String,
    /// Nominal center in canvas pixels
    pub expected: Point,
    pub radius_px: f64,
    pub outcome: MarkOutcome,
}

impl RegistrationMark {
    /// Observed center, if the mark was found.
    pub fn detected(&self) -> Option<Point> {
        match self.outcome {
            MarkOutcome::Found { position, .. } => Some(position),
            MarkOutcome::Missing { .. } => None,
        }
    }
}

/// Score a candidate center.
///
/// Returns `None` when the inner square or the ring falls entirely off
/// the canvas.
fn score_at(integral: &DarkIntegral, cx: i64, cy: i64, radius_px: f64) -> Option<f64> {
    let inner = ((INNER_FACTOR * radius_px).floor() as i64).max(1);
    let near = (radius_px.ceil() as i64).saturating_add(RING_GAP_PX);
    let far = ((OUTER_FACTOR * radius_px).ceil() as i64).saturating_add(RING_GAP_PX);

    let (d_in, t_in) = integral.count_square(cx, cy, inner);
    let (d_near, t_near) = integral.count_square(cx, cy, near);
    let (d_far, t_far) = integral.count_square(cx, cy, far);
    let ring_total = t_far.saturating_sub(t_near);
    if t_in == 0 || ring_total == 0 {
        return None;
    }
    let ring_dark = d_far.saturating_sub(d_near);
    Some(d_in as f64 / t_in as f64 - ring_dark as f64 / ring_total as f64)
}

/// Find one mark near its nominal center.
///
/// Every candidate in the `±tolerance_px` window that lies on the canvas
/// is scored. If several share the best score their centroid is
/// reported, which puts the estimate in the middle of a flat plateau.
///
/// # Arguments
///
/// * `integral` - Dark map of the canvas
/// * `expected` - Nominal center in pixels
/// * `radius_px` - Mark radius in pixels
/// * `tolerance_px` - Half-width of the search window
/// * `min_score` - Minimum score for a match
pub fn locate_mark(
    integral: &DarkIntegral,
    expected: Point,
    radius_px: f64,
    tolerance_px: f64,
    min_score: f64,
) -> MarkOutcome {
    let ex = expected.x.round() as i64;
    let ey = expected.y.round() as i64;
    let t = tolerance_px.ceil() as i64;
    let x_max = integral.width() as i64 - 1;
    let y_max = integral.height() as i64 - 1;
    let x_range = ex.saturating_sub(t).max(0)..=ex.saturating_add(t).min(x_max);
    let y_range = ey.saturating_sub(t).max(0)..=ey.saturating_add(t).min(y_max);

    let mut best = f64::NEG_INFINITY;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut ties = 0usize;

    for cy in y_range {
        for cx in x_range.clone() {
            let Some(score) = score_at(integral, cx, cy, radius_px) else {
                continue;
            };
            if score > best + TIE_EPSILON {
                best = score;
                sum_x = cx as f64;
                sum_y = cy as f64;
                ties = 1;
            } else if (score - best).abs() <= TIE_EPSILON {
                sum_x += cx as f64;
                sum_y += cy as f64;
                ties += 1;
            }
        }
    }

    if ties > 0 && best > min_score {
        MarkOutcome::Found {
            position: Point::new(sum_x / ties as f64, sum_y / ties as f64),
            score: best,
        }
    } else {
        MarkOutcome::Missing {
            best_score: if best.is_finite() { best } else { 0.0 },
        }
    }
}

/// Per-mark entry of a [`RectificationReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkReport {
    pub id: String,
    pub expected: Point,
    pub detected: Option<Point>,
    pub score: f64,
}

/// Summary of registration, attached to every scan result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectificationReport {
    pub markers_expected: usize,
    pub markers_detected: usize,
    pub marks: Vec<MarkReport>,
    /// Coefficients `[a, b, tx, c, d, ty]` of the nominal-to-canvas map
    pub transform: Option<[f64; 6]>,
    /// Rotation component of the map in degrees, clockwise positive
    pub skew_angle_deg: Option<f64>,
}

/// All marks of a layout, located on one canvas
#[derive(Debug, Clone)]
pub struct Registration {
    pub marks: Vec<RegistrationMark>,
}

impl Registration {
    /// Search the canvas for every registration mark of the layout.
    ///
    /// Millimeters are converted with the canvas resolution, so a layout
    /// authored at one dpi reads sheets scanned at another.
    pub fn locate(canvas: &Canvas, layout: &TemplateLayout, config: &ScanConfig) -> Self {
        let dpi = canvas.dpi();
        let integral = DarkIntegral::new(canvas, config.dark_threshold);
        let tolerance_px = mm_to_px(config.mark_search_tolerance_mm, dpi);

        let marks = layout
            .registration_marks
            .iter()
            .map(|mark| {
                let expected = mark.center_px(dpi);
                let radius_px = mark.radius_px(dpi);
                let outcome = locate_mark(
                    &integral,
                    expected,
                    radius_px,
                    tolerance_px,
                    config.mark_min_score,
                );
                debug!(mark = %mark.id, ?outcome, "registration mark");
                RegistrationMark {
                    id: mark.id.clone(),
                    expected,
                    radius_px,
                    outcome,
                }
            })
            .collect();
        Self { marks }
    }

    /// Number of marks found.
    pub fn found_count(&self) -> usize {
        self.marks.iter().filter(|m| m.detected().is_some()).count()
    }

    /// Fit the nominal-to-canvas map.
    ///
    /// With affine correction enabled a least-squares affine fit is used;
    /// otherwise the map is the mean offset of the found marks.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::RectificationFailure`] if fewer than
    /// `min_marks_required` marks were found, if the found marks are
    /// degenerate, or if the fitted map mirrors or collapses the page.
    pub fn correction(&self, config: &ScanConfig) -> RecogResult<AffineMatrix> {
        let (nominal, observed): (Vec<Point>, Vec<Point>) = self
            .marks
            .iter()
            .filter_map(|m| m.detected().map(|d| (m.expected, d)))
            .unzip();
        let found = nominal.len();
        let required = config.min_marks_required;
        let failure = || RecogError::RectificationFailure { found, required };
        if found < required {
            return Err(failure());
        }

        if !config.features.affine_correction {
            let n = found as f64;
            let (tx, ty) = nominal
                .iter()
                .zip(&observed)
                .fold((0.0, 0.0), |(sx, sy), (e, o)| (sx + o.x - e.x, sy + o.y - e.y));
            return Ok(AffineMatrix::translation(tx / n, ty / n));
        }

        let fit = AffineMatrix::fit(&nominal, &observed).map_err(|_| failure())?;
        if fit.determinant() <= 0.0 {
            return Err(failure());
        }
        Ok(fit)
    }

    /// Build the report for this registration and its fitted map.
    pub fn report(&self, transform: Option<&AffineMatrix>) -> RectificationReport {
        RectificationReport {
            markers_expected: self.marks.len(),
            markers_detected: self.found_count(),
            marks: self
                .marks
                .iter()
                .map(|m| MarkReport {
                    id: m.id.clone(),
                    expected: m.expected,
                    detected: m.detected(),
                    score: m.outcome.score(),
                })
                .collect(),
            transform: transform.map(|t| *t.coeffs()),
            skew_angle_deg: transform.map(AffineMatrix::rotation_deg),
        }
    }
}
