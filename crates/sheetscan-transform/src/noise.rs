//! Bounded additive noise
//!
//! Each pixel receives an independent offset drawn uniformly from
//! `[-level, level]`; the sum is clamped to `[0, 255]`. The generator is
//! supplied by the caller so that a seeded generator makes the output
//! reproducible.

use rand::Rng;
use sheetscan_core::Canvas;

/// Add uniform noise of amplitude `level` to every pixel.
///
/// Pixels are visited in row-major order, one draw each. A level of zero
/// returns the input unchanged and draws nothing.
pub fn add_noise<R: Rng>(canvas: &Canvas, level: u8, rng: &mut R) -> Canvas {
    if level == 0 {
        return canvas.clone();
    }
    let level = level as i16;
    let mut out = canvas.to_mut();
    for v in out.data_mut() {
        let delta = rng.random_range(-level..=level);
        *v = (*v as i16 + delta).clamp(0, 255) as u8;
    }
    out.into()
}
