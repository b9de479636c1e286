//! Ink density estimation for free-text regions
//!
//! Handwriting is not transcribed. The estimator only decides whether a
//! region holds writing: it samples the region (inset by
//! `region_inset_mm` to skip the printed border) through the
//! registration map and measures the dark-pixel density.
//!
//! A region whose mapped corners leave the canvas is reported as
//! `region_not_found`. A density at or below `writing_threshold` is
//! reported as `ocr_failed` with no answer. Anything denser yields
//! [`HANDWRITTEN_MARKER`] and always asks for manual review.

use crate::ScanConfig;
use crate::result::Warning;
use sheetscan_core::{Canvas, HANDWRITTEN_MARKER, Point, Region, mm_to_px};
use sheetscan_transform::AffineMatrix;
use std::collections::BTreeSet;

/// Upper bound on the confidence of a handwriting detection.
pub const MAX_INK_CONFIDENCE: f64 = 0.95;

/// Outcome of estimating one region
#[derive(Debug, Clone, PartialEq)]
pub struct InkOutcome {
    pub selected: Option<String>,
    pub confidence: f64,
    pub warnings: BTreeSet<Warning>,
    pub needs_review: bool,
    /// Measured density, `None` when the region was not found
    pub density: Option<f64>,
}

impl InkOutcome {
    fn failed(warning: Warning, density: Option<f64>) -> Self {
        Self {
            selected: None,
            confidence: 0.0,
            warnings: BTreeSet::from([warning]),
            needs_review: true,
            density,
        }
    }
}

/// Confidence that a density reflects writing.
///
/// `min(0.95, 1 - exp(-density / saturation))`
pub fn ink_confidence(density: f64, saturation: f64) -> f64 {
    (1.0 - (-density / saturation).exp()).clamp(0.0, MAX_INK_CONFIDENCE)
}

/// Whether a canvas-space point lies on the canvas, edges included.
fn on_canvas(canvas: &Canvas, p: Point) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x <= canvas.width() as f64 && p.y <= canvas.height() as f64
}

/// Dark-pixel density of a region.
///
/// Returns `None` if the mapped region is not wholly on the canvas or
/// the inset leaves nothing to sample.
pub fn measure_region(
    canvas: &Canvas,
    transform: &AffineMatrix,
    region: &Region,
    config: &ScanConfig,
) -> Option<f64> {
    let dpi = canvas.dpi();
    let rect = region.to_px(dpi);
    if !rect
        .corners()
        .iter()
        .all(|&c| on_canvas(canvas, transform.transform_point(c)))
    {
        return None;
    }

    let sample = rect.inset(mm_to_px(config.region_inset_mm, dpi));
    let x0 = sample.x.ceil() as i64;
    let y0 = sample.y.ceil() as i64;
    let x1 = sample.right().ceil() as i64;
    let y1 = sample.bottom().ceil() as i64;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut dark = 0usize;
    let mut total = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = transform.transform_point(Point::new(x as f64, y as f64));
            total += 1;
            if canvas
                .pixel_at(p.x.round() as i64, p.y.round() as i64)
                .is_some_and(|v| v < config.dark_threshold)
            {
                dark += 1;
            }
        }
    }
    Some(dark as f64 / total as f64)
}

/// Decide whether a region holds writing.
pub fn estimate_region(
    canvas: &Canvas,
    transform: &AffineMatrix,
    region: &Region,
    config: &ScanConfig,
) -> InkOutcome {
    let Some(density) = measure_region(canvas, transform, region, config) else {
        return InkOutcome::failed(Warning::RegionNotFound, None);
    };
    if density <= config.writing_threshold {
        return InkOutcome::failed(Warning::OcrFailed, Some(density));
    }

    let confidence = ink_confidence(density, config.ink_saturation);
    let mut warnings = BTreeSet::new();
    if confidence < config.review_threshold {
        warnings.insert(Warning::LowConfidence);
    }
    InkOutcome {
        selected: Some(HANDWRITTEN_MARKER.to_string()),
        confidence,
        warnings,
        needs_review: true,
        density: Some(density),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetscan_core::CanvasMut;

    fn sheet() -> CanvasMut {
        let mut cm = CanvasMut::new(300, 200, 255).unwrap();
        cm.set_dpi(150).unwrap();
        cm
    }

    #[test]
    fn test_confidence_curve() {
        assert_eq!(ink_confidence(0.0, 0.02), 0.0);
        assert!((ink_confidence(0.02, 0.02) - (1.0 - (-1.0f64).exp())).abs() < 1e-12);
        assert_eq!(ink_confidence(0.5, 0.02), MAX_INK_CONFIDENCE);
        assert!(ink_confidence(0.03, 0.02) > ink_confidence(0.02, 0.02));
    }

    #[test]
    fn test_empty_region_is_ocr_failed() {
        let mut cm = sheet();
        let region = Region::new(5.0, 5.0, 30.0, 10.0);
        cm.draw_rect_outline(region.to_px(150), 1.0, 0);
        let c: Canvas = cm.into();
        let out = estimate_region(&c, &AffineMatrix::identity(), &region, &ScanConfig::default());
        assert_eq!(out.selected, None);
        assert_eq!(out.warnings, BTreeSet::from([Warning::OcrFailed]));
        assert_eq!(out.density, Some(0.0));
        assert_eq!(out.confidence, 0.0);
    }

    #[test]
    fn test_written_region() {
        let mut cm = sheet();
        let region = Region::new(5.0, 5.0, 30.0, 10.0);
        let rect = region.to_px(150);
        cm.fill_rect(rect.inset(15.0), 60);
        let c: Canvas = cm.into();
        let out = estimate_region(&c, &AffineMatrix::identity(), &region, &ScanConfig::default());
        assert_eq!(out.selected.as_deref(), Some(HANDWRITTEN_MARKER));
        assert!(out.warnings.is_empty());
        assert!(out.needs_review);
        assert_eq!(out.confidence, MAX_INK_CONFIDENCE);
    }

    #[test]
    fn test_region_off_canvas() {
        let c: Canvas = sheet().into();
        let region = Region::new(5.0, 5.0, 30.0, 10.0);
        let shifted = AffineMatrix::translation(250.0, 0.0);
        let out = estimate_region(&c, &shifted, &region, &ScanConfig::default());
        assert_eq!(out.warnings, BTreeSet::from([Warning::RegionNotFound]));
        assert_eq!(out.density, None);
    }
}
