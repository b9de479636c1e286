//! Identification field reading
//!
//! Bubble grids are decoded one character position at a time with the
//! fill detector; a position without a clear mark leaves the whole
//! identifier unread. Handwritten text fields can only be checked for
//! presence, so they report [`HANDWRITTEN_MARKER`](sheetscan_core::HANDWRITTEN_MARKER)
//! like any free-text answer.

use crate::ScanConfig;
use crate::fill::detect_fields;
use crate::ink::estimate_region;
use crate::result::{IdReading, Identification};
use sheetscan_core::{BubbleGrid, Canvas, IdField, IdFields};
use sheetscan_transform::AffineMatrix;
use std::collections::BTreeSet;

fn read_grid(
    canvas: &Canvas,
    transform: &AffineMatrix,
    grid: &BubbleGrid,
    config: &ScanConfig,
) -> IdReading {
    let mut value = Some(String::with_capacity(grid.positions as usize));
    let mut confidence = 1.0f64;
    let mut warnings = BTreeSet::new();
    let mut needs_review = false;

    for position in 0..grid.positions {
        let outcome = detect_fields(canvas, transform, &grid.row_fields(position), config);
        confidence = confidence.min(outcome.confidence);
        warnings.extend(outcome.warnings);
        needs_review |= outcome.needs_review;
        match outcome.selected {
            Some(symbol) => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&symbol);
                }
            }
            None => value = None,
        }
    }

    if value.is_none() {
        needs_review = true;
    }
    IdReading {
        value,
        confidence,
        warnings,
        needs_review,
    }
}

/// Read one identification field.
pub fn read_id_field(
    canvas: &Canvas,
    transform: &AffineMatrix,
    field: &IdField,
    config: &ScanConfig,
) -> IdReading {
    match field {
        IdField::BubbleGrid(grid) => read_grid(canvas, transform, grid, config),
        IdField::Text(region) => {
            let outcome = estimate_region(canvas, transform, region, config);
            IdReading {
                value: outcome.selected,
                confidence: outcome.confidence,
                warnings: outcome.warnings,
                needs_review: outcome.needs_review,
            }
        }
    }
}

/// Read every identification field present on the layout.
pub fn identify(
    canvas: &Canvas,
    transform: &AffineMatrix,
    fields: &IdFields,
    config: &ScanConfig,
) -> Identification {
    Identification {
        version_id: fields
            .version_id
            .as_ref()
            .map(|f| read_id_field(canvas, transform, f, config)),
        student_id: fields
            .student_id
            .as_ref()
            .map(|f| read_id_field(canvas, transform, f, config)),
    }
}
