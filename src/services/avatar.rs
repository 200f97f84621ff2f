//! Avatar synthesizer - procedurally generates placeholder avatars
//!
//! Builds a fixed-size canvas filled with a linear gradient between two
//! random colors and encodes it as PNG. Colors are sampled fresh per call
//! from an unseeded RNG, so repeated calls are non-reproducible by design.

use crate::error::Result;
use crate::services::normalizer::encode_png;
use bytes::Bytes;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::Rng;

/// Avatar canvas edge length, in pixels
pub const AVATAR_SIZE: u32 = 420;

/// Generate a placeholder avatar as PNG bytes
///
/// The gradient runs along the top-left to bottom-right diagonal between two
/// colors drawn uniformly over the full RGB space.
pub fn synthesize_avatar() -> Result<Bytes> {
    let mut rng = rand::thread_rng();
    let start: [u8; 3] = rng.gen();
    let end: [u8; 3] = rng.gen();

    render_gradient(start, end)
}

fn render_gradient(start: [u8; 3], end: [u8; 3]) -> Result<Bytes> {
    let max = (2 * (AVATAR_SIZE - 1)) as f32;

    let canvas = ImageBuffer::from_fn(AVATAR_SIZE, AVATAR_SIZE, |x, y| {
        // Projection of (x, y) onto the diagonal, in [0, 1]
        let t = (x + y) as f32 / max;
        Rgb([
            lerp(start[0], end[0], t),
            lerp(start[1], end[1], t),
            lerp(start[2], end[2], t),
        ])
    });

    encode_png(&DynamicImage::ImageRgb8(canvas))
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}
