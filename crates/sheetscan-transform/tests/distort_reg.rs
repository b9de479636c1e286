//! Distortion regression test
//!
//! Tests the geometric operations against their analytic effect:
//!   1. Rotating a set of discs moves their centroids along circular arcs
//!   2. The affine fit between original and rotated centroids recovers
//!      the rotation angle
//!   3. Shear moves centroids horizontally in proportion to the row offset
//!   4. Noise is zero-mean and bounded
//!   5. The composed distortion is reproducible for a fixed seed

use rand::SeedableRng;
use rand::rngs::StdRng;
use sheetscan_core::{Canvas, CanvasMut, Point};
use sheetscan_test::RegParams;
use sheetscan_transform::{AffineMatrix, Distortion, add_noise, rotate, skew};

const W: u32 = 301;
const H: u32 = 201;

fn disc_centers() -> Vec<Point> {
    vec![
        Point::new(40.0, 40.0),
        Point::new(260.0, 40.0),
        Point::new(40.0, 160.0),
        Point::new(260.0, 160.0),
    ]
}

fn disc_canvas() -> Canvas {
    let mut cm = CanvasMut::new(W, H, 255).unwrap();
    for c in disc_centers() {
        cm.fill_disc(c, 8.0, 0);
    }
    cm.into()
}

/// Centroid of dark pixels inside a window around `near`.
fn dark_centroid(canvas: &Canvas, near: Point, half: i64) -> Point {
    let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
    for y in (near.y as i64 - half)..=(near.y as i64 + half) {
        for x in (near.x as i64 - half)..=(near.x as i64 + half) {
            if canvas.pixel_at(x, y).is_some_and(|v| v < 128) {
                sx += x as f64;
                sy += y as f64;
                n += 1.0;
            }
        }
    }
    Point::new(sx / n, sy / n)
}

#[test]
fn distort_reg() {
    let mut rp = RegParams::new("distort");
    let canvas = disc_canvas();
    let center = Point::new((W - 1) as f64 / 2.0, (H - 1) as f64 / 2.0);

    // --- Test 1 & 2: rotation ---
    for angle in [-6.0f64, 2.5, 8.0] {
        let rotated = rotate(&canvas, angle).expect("rotate");
        let (s, c) = angle.to_radians().sin_cos();
        let mut observed = Vec::new();
        for p in disc_centers() {
            let (dx, dy) = (p.x - center.x, p.y - center.y);
            let expected = Point::new(center.x + dx * c - dy * s, center.y + dx * s + dy * c);
            let got = dark_centroid(&rotated, expected, 14);
            rp.compare_values(0.0, got.distance(&expected), 0.75);
            observed.push(got);
        }
        let fit = AffineMatrix::fit(&disc_centers(), &observed).expect("fit");
        rp.compare_values(angle, fit.rotation_deg(), 0.2);
        rp.compare_values(1.0, fit.determinant(), 0.02);
        eprintln!("  rotate {angle}: fitted {:.3} deg", fit.rotation_deg());
    }

    // --- Test 3: shear ---
    let factor = 0.04;
    let sheared = skew(&canvas, factor).expect("skew");
    for p in disc_centers() {
        let expected = Point::new(p.x + factor * (p.y - center.y), p.y);
        let got = dark_centroid(&sheared, expected, 14);
        rp.compare_values(0.0, got.distance(&expected), 0.75);
    }

    // --- Test 4: noise statistics ---
    let gray = Canvas::new(200, 200, 128).unwrap();
    let noisy = add_noise(&gray, 30, &mut StdRng::seed_from_u64(42));
    let n = noisy.data().len() as f64;
    let mean = noisy.data().iter().map(|&v| v as f64).sum::<f64>() / n;
    let max_dev = noisy
        .data()
        .iter()
        .map(|&v| (v as i32 - 128).abs())
        .max()
        .unwrap_or(0);
    rp.compare_values(128.0, mean, 0.5);
    rp.compare_values(1.0, if max_dev <= 30 { 1.0 } else { 0.0 }, 0.0);
    // uniform on [-30, 30] has variance 30*31/3 = 310
    let var = noisy
        .data()
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    rp.compare_values(310.0, var, 15.0);

    // --- Test 5: composed distortion ---
    let d = Distortion::new(1.5, -0.02, 25);
    let a = d.apply(&canvas, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = d.apply(&canvas, &mut StdRng::seed_from_u64(3)).unwrap();
    rp.compare_canvas(&a, &b);

    assert!(rp.cleanup());
}
