//! Mark and bubble renderer
//!
//! Drawing primitives specialised for answer sheets. Every size is given
//! in millimeters by the layout and converted with the canvas resolution.
//!
//! | Element | Intensity |
//! |---|---|
//! | Registration mark | 0 |
//! | Field and region outline | 0 |
//! | Filled bubble interior | 50 |
//! | Handwriting stroke | 60 |

use rand::Rng;
use sheetscan_core::{AnswerField, CanvasMut, FieldType, Point, Rect, RegistrationMarkSpec, Region, mm_to_px};

/// Intensity of registration marks.
pub const MARK_INTENSITY: u8 = 0;
/// Intensity of printed outlines.
pub const OUTLINE_INTENSITY: u8 = 0;
/// Intensity of a pencil-filled bubble.
pub const FILL_INTENSITY: u8 = 50;
/// Intensity of handwriting strokes.
pub const INK_INTENSITY: u8 = 60;

/// Printed outline width in millimeters.
pub const OUTLINE_MM: f64 = 0.2;
/// Handwriting pen width in millimeters.
pub const PEN_MM: f64 = 0.5;
/// Height of one handwritten line in millimeters.
pub const LINE_PITCH_MM: f64 = 12.0;

/// Margin kept free between handwriting and the region border.
const WRITING_MARGIN_MM: f64 = 1.5;

fn outline_px(dpi: u32) -> f64 {
    mm_to_px(OUTLINE_MM, dpi).max(1.0)
}

/// Draw a solid registration disc of radius `size_mm`.
pub fn draw_registration_mark(canvas: &mut CanvasMut, mark: &RegistrationMarkSpec) {
    let dpi = canvas.dpi();
    canvas.fill_disc(mark.center_px(dpi), mark.radius_px(dpi), MARK_INTENSITY);
}

/// Draw an answer field outline, filling its interior when `filled`.
///
/// The outline sits just inside the nominal radius; the fill covers
/// everything within it.
pub fn draw_answer_field(canvas: &mut CanvasMut, field: &AnswerField, filled: bool) {
    let dpi = canvas.dpi();
    let center = field.center_px(dpi);
    let r = field.radius_px(dpi);
    let stroke = outline_px(dpi);

    match field.field_type {
        FieldType::Circle => {
            if filled {
                canvas.fill_disc(center, r - stroke, FILL_INTENSITY);
            }
            canvas.draw_ring(center, r, stroke, OUTLINE_INTENSITY);
        }
        FieldType::Box => {
            let outer = Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r);
            if filled {
                canvas.fill_rect(outer.inset(stroke), FILL_INTENSITY);
            }
            canvas.draw_rect_outline(outer, stroke, OUTLINE_INTENSITY);
        }
    }
}

/// Draw the printed border of a free-text region.
pub fn draw_region_outline(canvas: &mut CanvasMut, region: &Region) {
    let dpi = canvas.dpi();
    canvas.draw_rect_outline(region.to_px(dpi), outline_px(dpi), OUTLINE_INTENSITY);
}

/// Scribble pseudo-handwriting inside a region.
///
/// The region is split into lines of about [`LINE_PITCH_MM`]. Each line
/// holds "words": zigzag polylines 4-12 mm wide separated by 2-4 mm gaps,
/// wandering up and down around the line's center. Nothing is drawn
/// outside the region shrunk by a small margin.
pub fn draw_handwriting<R: Rng>(canvas: &mut CanvasMut, region: &Region, rng: &mut R) {
    let dpi = canvas.dpi();
    let area = region.to_px(dpi).inset(mm_to_px(WRITING_MARGIN_MM, dpi));
    let pen = mm_to_px(PEN_MM, dpi).max(1.0);
    // keep the pen inside the writing area
    let area = area.inset(pen / 2.0);
    if area.is_empty() {
        return;
    }

    let lines = ((area.h / mm_to_px(LINE_PITCH_MM, dpi)).floor() as usize).max(1);
    let line_h = area.h / lines as f64;
    let amplitude = 0.35 * line_h;
    let step_min = mm_to_px(0.8, dpi).max(1.0);
    let step_max = mm_to_px(1.6, dpi).max(step_min + 1.0);

    for i in 0..lines {
        let baseline = area.y + (i as f64 + 0.5) * line_h;
        let mut x = area.x;
        while x < area.right() {
            let word_w = mm_to_px(rng.random_range(4.0..12.0), dpi);
            let end = (x + word_w).min(area.right());
            let mut stroke = vec![Point::new(x, baseline)];
            let mut px = x;
            while px < end {
                px = (px + rng.random_range(step_min..step_max)).min(end);
                let py = baseline + rng.random_range(-amplitude..=amplitude);
                stroke.push(Point::new(px, py));
            }
            canvas.draw_polyline(&stroke, pen, INK_INTENSITY);
            x = end + mm_to_px(rng.random_range(2.0..4.0), dpi);
        }
    }
}
