//! Deterministic synthetic images for unit tests.

use image::{GrayImage, Luma};

/// Integer finalizer with full avalanche; neighbouring inputs give
/// unrelated outputs.
pub fn mix(mut v: u32) -> u32 {
    v ^= v >> 16;
    v = v.wrapping_mul(0x7feb_352d);
    v ^= v >> 15;
    v = v.wrapping_mul(0x846c_a68b);
    v ^= v >> 16;
    v
}

pub fn noise_value(x: u32, y: u32, seed: u32) -> u8 {
    (mix(x ^ mix(y ^ mix(seed))) >> 24) as u8
}

pub fn noise_image(width: u32, height: u32, seed: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([noise_value(x, y, seed)]))
}
