//! Dark-pixel integral image
//!
//! A summed-area table over the indicator "pixel is darker than the
//! threshold". Once built, the number of dark pixels in any axis-aligned
//! box is four lookups, which makes exhaustive window scans affordable.

use super::Canvas;

/// Summed-area table of dark pixels
///
/// The table has `(width + 1) * (height + 1)` entries with a zero first
/// row and column, so `a(x, y)` counts dark pixels in `[0, x) x [0, y)`.
/// The recursion is `a(x+1, y+1) = v(x, y) + a(x, y+1) + a(x+1, y) - a(x, y)`.
#[derive(Debug, Clone)]
pub struct DarkIntegral {
    width: u32,
    height: u32,
    table: Vec<u32>,
}

impl DarkIntegral {
    /// Build the table, counting pixels with intensity `< threshold`.
    pub fn new(canvas: &Canvas, threshold: u8) -> Self {
        let w = canvas.width() as usize;
        let h = canvas.height() as usize;
        let stride = w + 1;
        let mut table = vec![0u32; stride * (h + 1)];
        let data = canvas.data();

        for y in 0..h {
            let mut row_sum = 0u32;
            for x in 0..w {
                if data[y * w + x] < threshold {
                    row_sum += 1;
                }
                table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
            }
        }

        Self {
            width: canvas.width(),
            height: canvas.height(),
            table,
        }
    }

    /// Width of the underlying canvas.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the underlying canvas.
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> u32 {
        self.table[y * (self.width as usize + 1) + x]
    }

    /// Count pixels in the half-open box `[x0, x1) x [y0, y1)`.
    ///
    /// The box is clipped to the canvas first. Returns
    /// `(dark_count, pixel_count)` for the clipped box; both are zero if
    /// nothing of the box lies on the canvas.
    pub fn count(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> (u32, u32) {
        let cx0 = x0.clamp(0, self.width as i64) as usize;
        let cy0 = y0.clamp(0, self.height as i64) as usize;
        let cx1 = x1.clamp(0, self.width as i64) as usize;
        let cy1 = y1.clamp(0, self.height as i64) as usize;
        if cx1 <= cx0 || cy1 <= cy0 {
            return (0, 0);
        }
        let dark = self.at(cx1, cy1) + self.at(cx0, cy0) - self.at(cx0, cy1) - self.at(cx1, cy0);
        let total = ((cx1 - cx0) * (cy1 - cy0)) as u32;
        (dark, total)
    }

    /// Count pixels in the square of half-size `half` centered on
    /// `(cx, cy)`, i.e. `[cx - half, cx + half]` in both axes.
    pub fn count_square(&self, cx: i64, cy: i64, half: i64) -> (u32, u32) {
        self.count(
            cx.saturating_sub(half),
            cy.saturating_sub(half),
            cx.saturating_add(half).saturating_add(1),
            cy.saturating_add(half).saturating_add(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasMut;
    use crate::geometry::Rect;

    #[test]
    fn test_counts_match_brute_force() {
        let mut cm = CanvasMut::new(17, 11, 255).unwrap();
        cm.fill_rect(Rect::new(3.0, 2.0, 5.0, 4.0), 10);
        cm.set(15, 9, 127).unwrap();
        cm.set(14, 9, 128).unwrap();
        let c: Canvas = cm.into();
        let ii = DarkIntegral::new(&c, 128);

        assert_eq!(ii.count(0, 0, 17, 11), (21, 187));
        assert_eq!(ii.count(3, 2, 8, 6), (20, 20));
        assert_eq!(ii.count(4, 3, 6, 5), (4, 4));
        assert_eq!(ii.count(14, 9, 16, 10), (1, 2));
    }

    #[test]
    fn test_count_clips() {
        let c = Canvas::new(10, 10, 0).unwrap();
        let ii = DarkIntegral::new(&c, 128);
        assert_eq!(ii.count(-5, -5, 2, 3), (6, 6));
        assert_eq!(ii.count(20, 20, 30, 30), (0, 0));
        assert_eq!(ii.count_square(0, 0, 2), (9, 9));
        assert_eq!(ii.count_square(5, 5, 1), (9, 9));
    }
}
