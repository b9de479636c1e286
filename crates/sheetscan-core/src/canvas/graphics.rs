//! Drawing primitives
//!
//! This module provides the shapes the sheet renderer needs:
//! - Filled discs (registration marks, filled bubbles)
//! - Rings (bubble outlines)
//! - Thick lines and polylines (pseudo-handwriting)
//! - Rectangles, filled and outlined (box fields, text regions)
//!
//! Integer pixel coordinates denote pixel centers. Everything is clipped
//! to the canvas; drawing partly outside is not an error.

use super::CanvasMut;
use crate::geometry::{Point, Rect};

/// Generate the pixels of a line using Bresenham's algorithm.
///
/// Both endpoints are included.
pub fn line_points(x1: i64, y1: i64, x2: i64, y2: i64) -> Vec<(i64, i64)> {
    if x1 == x2 && y1 == y2 {
        return vec![(x1, y1)];
    }

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1 } else { -1 };
    let sy = if y2 > y1 { 1 } else { -1 };

    let npts = dx.max(dy) + 1;
    let mut pts = Vec::with_capacity(npts as usize);
    let mut x = x1;
    let mut y = y1;

    if dx >= dy {
        let mut err = dx / 2;
        for _ in 0..npts {
            pts.push((x, y));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2;
        for _ in 0..npts {
            pts.push((x, y));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    pts
}

/// Offsets `(dx, dy)` of every pixel center within `radius` of the origin.
///
/// A radius below 0.5 still yields the single center pixel.
pub fn disc_offsets(radius: f64) -> Vec<(i64, i64)> {
    let r = radius.max(0.0);
    let extent = r.floor() as i64;
    let r_sq = r * r;
    let mut offsets = Vec::with_capacity(((2 * extent + 1) * (2 * extent + 1)) as usize);
    for dy in -extent..=extent {
        for dx in -extent..=extent {
            if (dx * dx + dy * dy) as f64 <= r_sq {
                offsets.push((dx, dy));
            }
        }
    }
    if offsets.is_empty() {
        offsets.push((0, 0));
    }
    offsets
}

impl CanvasMut {
    /// Fill every pixel whose center lies within `radius` of `center`.
    pub fn fill_disc(&mut self, center: Point, radius: f64, value: u8) {
        let cx = center.x.round() as i64;
        let cy = center.y.round() as i64;
        for (dx, dy) in disc_offsets(radius) {
            self.set_clipped(cx + dx, cy + dy, value);
        }
    }

    /// Draw a circular ring.
    ///
    /// The ring covers pixel centers whose distance `d` from `center`
    /// satisfies `radius - thickness < d <= radius`, so the outer edge of
    /// the stroke coincides with the nominal radius.
    pub fn draw_ring(&mut self, center: Point, radius: f64, thickness: f64, value: u8) {
        let thickness = thickness.max(1.0);
        let outer_sq = radius * radius;
        let inner = (radius - thickness).max(0.0);
        let inner_sq = inner * inner;
        let cx = center.x.round() as i64;
        let cy = center.y.round() as i64;
        let extent = radius.ceil() as i64;

        for dy in -extent..=extent {
            for dx in -extent..=extent {
                let d_sq = (dx * dx + dy * dy) as f64;
                if d_sq <= outer_sq && (d_sq > inner_sq || inner == 0.0) {
                    self.set_clipped(cx + dx, cy + dy, value);
                }
            }
        }
    }

    /// Draw a straight line of the given stroke width.
    pub fn draw_line(&mut self, p1: Point, p2: Point, width: f64, value: u8) {
        let pen = disc_offsets(width / 2.0);
        let pts = line_points(
            p1.x.round() as i64,
            p1.y.round() as i64,
            p2.x.round() as i64,
            p2.y.round() as i64,
        );
        for (x, y) in pts {
            for &(dx, dy) in &pen {
                self.set_clipped(x + dx, y + dy, value);
            }
        }
    }

    /// Draw connected line segments through `points`.
    pub fn draw_polyline(&mut self, points: &[Point], width: f64, value: u8) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], width, value);
        }
    }

    /// Fill an axis-aligned rectangle.
    ///
    /// Covers pixel centers `x` with `round(rect.x) <= x < round(rect.right())`,
    /// and likewise for `y`.
    pub fn fill_rect(&mut self, rect: Rect, value: u8) {
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let x1 = rect.right().round() as i64;
        let y1 = rect.bottom().round() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_clipped(x, y, value);
            }
        }
    }

    /// Draw the outline of a rectangle, with the stroke on the inside.
    pub fn draw_rect_outline(&mut self, rect: Rect, thickness: f64, value: u8) {
        let t = thickness.max(1.0);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), value);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), value);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.h), value);
        self.fill_rect(Rect::new(rect.right() - t, rect.y, t, rect.h), value);
    }
}
