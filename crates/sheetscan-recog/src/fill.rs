//! Bubble fill detection
//!
//! Each answer field is sampled inside its outline, pulled in by
//! `bubble_inset_mm` so the printed stroke never counts as fill. Sample
//! points are laid out on the nominal pixel grid and carried onto the
//! canvas by the registration map. A sample that lands off the canvas
//! counts as not dark.
//!
//! Classification works on the fill ratios of all fields of a question:
//!
//! | situation                  | selected | warnings                  |
//! |----------------------------|----------|---------------------------|
//! | no ratio >= threshold      | none     | `no_bubble_filled`        |
//! | exactly one >= threshold   | best     |                           |
//! | several >= threshold       | best     | `multiple_bubbles_filled` |
//!
//! and any answer whose confidence is below `review_threshold` also
//! gets `low_confidence`.

use crate::ScanConfig;
use crate::result::Warning;
use serde::{Deserialize, Serialize};
use sheetscan_core::canvas::graphics::disc_offsets;
use sheetscan_core::{AnswerField, Canvas, FieldType, Point, mm_to_px};
use sheetscan_transform::AffineMatrix;
use std::collections::BTreeSet;

/// Fill ratio at which the fill term of the confidence saturates.
const FULL_FILL_RATIO: f64 = 0.6;

/// Margin over the runner-up at which the margin term saturates.
const FULL_MARGIN: f64 = 0.5;

/// Share of the confidence given to the fill term.
const FILL_WEIGHT: f64 = 0.4;

/// Measured fill of one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSample {
    pub label: String,
    pub fill_ratio: f64,
}

/// Classification of one set of fields
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub selected: Option<String>,
    pub confidence: f64,
    pub warnings: BTreeSet<Warning>,
    pub needs_review: bool,
    pub samples: Vec<FillSample>,
}

/// Confidence of a selection from the best and runner-up fill ratios.
///
/// `0.4 * min(1, best / 0.6) + 0.6 * min(1, (best - runner_up) / 0.5)`,
/// clamped to `[0, 1]`. It rises with the best ratio and with its margin
/// over the runner-up, and reaches 1 for a solid fill next to blank options.
pub fn fill_confidence(best: f64, runner_up: f64) -> f64 {
    let fill = (best / FULL_FILL_RATIO).clamp(0.0, 1.0);
    let margin = ((best - runner_up) / FULL_MARGIN).clamp(0.0, 1.0);
    (FILL_WEIGHT * fill + (1.0 - FILL_WEIGHT) * margin).clamp(0.0, 1.0)
}

/// Sample offsets (in pixels) covering the interior of a field.
fn sample_offsets(field: &AnswerField, radius_px: f64) -> Vec<(i64, i64)> {
    match field.field_type {
        FieldType::Circle => disc_offsets(radius_px),
        FieldType::Box => {
            let half = radius_px.floor() as i64;
            (-half..=half)
                .flat_map(|dy| (-half..=half).map(move |dx| (dx, dy)))
                .collect()
        }
    }
}

/// Fraction of dark samples inside one field.
///
/// # Arguments
///
/// * `canvas` - Scanned sheet
/// * `transform` - Nominal-to-canvas map from registration
/// * `field` - Field to measure
/// * `config` - Supplies the dark threshold and the inset
pub fn measure_field(
    canvas: &Canvas,
    transform: &AffineMatrix,
    field: &AnswerField,
    config: &ScanConfig,
) -> f64 {
    let dpi = canvas.dpi();
    let center = field.center_px(dpi);
    let radius = mm_to_px(field.radius_mm - config.bubble_inset_mm, dpi).max(1.0);
    let offsets = sample_offsets(field, radius);
    if offsets.is_empty() {
        return 0.0;
    }

    let dark = offsets
        .iter()
        .filter(|&&(dx, dy)| {
            let p = transform.transform_point(Point::new(center.x + dx as f64, center.y + dy as f64));
            canvas
                .pixel_at(p.x.round() as i64, p.y.round() as i64)
                .is_some_and(|v| v < config.dark_threshold)
        })
        .count();
    dark as f64 / offsets.len() as f64
}

/// Classify measured fields.
///
/// Ties on the best ratio go to the field listed first.
pub fn classify(samples: Vec<FillSample>, config: &ScanConfig) -> FillOutcome {
    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.sort_by(|&a, &b| samples[b].fill_ratio.total_cmp(&samples[a].fill_ratio));
    let best = order.first().map(|&i| samples[i].fill_ratio).unwrap_or(0.0);
    let runner_up = order.get(1).map(|&i| samples[i].fill_ratio).unwrap_or(0.0);
    let above = samples
        .iter()
        .filter(|s| s.fill_ratio >= config.fill_threshold)
        .count();

    let mut warnings = BTreeSet::new();
    let mut needs_review = false;

    let (selected, confidence) = if above == 0 {
        warnings.insert(Warning::NoBubbleFilled);
        (None, (1.0 - best / config.fill_threshold).clamp(0.0, 1.0))
    } else {
        if above > 1 {
            warnings.insert(Warning::MultipleBubblesFilled);
            needs_review = true;
        }
        let label = order.first().map(|&i| samples[i].label.clone());
        (label, fill_confidence(best, runner_up))
    };

    if confidence < config.review_threshold {
        warnings.insert(Warning::LowConfidence);
        needs_review = true;
    }

    FillOutcome {
        selected,
        confidence,
        warnings,
        needs_review,
        samples,
    }
}

/// Measure and classify a set of fields.
pub fn detect_fields(
    canvas: &Canvas,
    transform: &AffineMatrix,
    fields: &[AnswerField],
    config: &ScanConfig,
) -> FillOutcome {
    let samples = fields
        .iter()
        .map(|f| FillSample {
            label: f.label.clone(),
            fill_ratio: measure_field(canvas, transform, f, config),
        })
        .collect();
    classify(samples, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetscan_core::CanvasMut;

    fn samples(ratios: &[(&str, f64)]) -> Vec<FillSample> {
        ratios
            .iter()
            .map(|&(label, fill_ratio)| FillSample {
                label: label.into(),
                fill_ratio,
            })
            .collect()
    }

    #[test]
    fn test_confidence_shape() {
        assert!((fill_confidence(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((fill_confidence(0.0, 0.0)).abs() < 1e-12);
        assert!(fill_confidence(0.9, 0.1) > fill_confidence(0.9, 0.5));
        assert!(fill_confidence(0.5, 0.0) > fill_confidence(0.4, 0.0));
        assert!((fill_confidence(1.0, 1.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_single_fill() {
        let out = classify(
            samples(&[("A", 0.02), ("B", 0.97), ("C", 0.0)]),
            &ScanConfig::default(),
        );
        assert_eq!(out.selected.as_deref(), Some("B"));
        assert!(out.warnings.is_empty());
        assert!(!out.needs_review);
        assert!(out.confidence > 0.95);
        assert_eq!(out.samples.len(), 3);
    }

    #[test]
    fn test_blank() {
        let out = classify(samples(&[("A", 0.0), ("B", 0.03)]), &ScanConfig::default());
        assert_eq!(out.selected, None);
        assert_eq!(out.warnings, BTreeSet::from([Warning::NoBubbleFilled]));
        assert!((out.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_fill() {
        let out = classify(
            samples(&[("A", 0.95), ("B", 0.0), ("C", 0.9)]),
            &ScanConfig::default(),
        );
        assert_eq!(out.selected.as_deref(), Some("A"));
        assert!(out.warnings.contains(&Warning::MultipleBubblesFilled));
        assert!(out.warnings.contains(&Warning::LowConfidence));
        assert!(out.needs_review);
    }

    #[test]
    fn test_measure_filled_and_empty_fields() {
        let mut cm = CanvasMut::new(200, 100, 255).unwrap();
        cm.set_dpi(150).unwrap();
        let filled = AnswerField::circle("A", 10.0, 8.0, 3.0);
        let empty = AnswerField::circle("B", 20.0, 8.0, 3.0);
        let dpi = 150;
        cm.fill_disc(filled.center_px(dpi), filled.radius_px(dpi) - 1.0, 50);
        cm.draw_ring(empty.center_px(dpi), empty.radius_px(dpi), 1.0, 0);
        let c: Canvas = cm.into();
        let config = ScanConfig::default();
        let id = AffineMatrix::identity();
        assert!(measure_field(&c, &id, &filled, &config) > 0.99);
        assert!(measure_field(&c, &id, &empty, &config) < 0.01);

        // shifted map misses the fill entirely
        let far = AffineMatrix::translation(0.0, 40.0);
        assert!(measure_field(&c, &far, &filled, &config) < 0.01);
    }
}
