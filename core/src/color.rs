//! Color-space conversion between linear and display encodings.
//!
//! The display encoding is an approximate sRGB curve (a pure power of
//! [`GAMMA`]). None of these functions clamp their input; values outside
//! `[0, 1]` are the caller's responsibility.

use crate::math::{clamp01, Vec4};

/// Exponent of the approximate display transfer curve.
pub const GAMMA: f32 = 2.2;

/// Convert a linear channel value to display (gamma-encoded) space.
#[inline]
pub fn to_display(linear: f32) -> f32 {
    linear.powf(1.0 / GAMMA)
}

/// Convert a display (gamma-encoded) channel value to linear space.
#[inline]
pub fn to_linear(display: f32) -> f32 {
    display.powf(GAMMA)
}

/// Convert a normalized channel value to an 8-bit integer.
///
/// Rounds to nearest; out-of-range inputs saturate at 0 or 255.
#[inline]
pub fn quantize(value: f32) -> u8 {
    (value * 255.0).round() as u8
}

/// Convert an 8-bit channel value to a normalized float.
#[inline]
pub fn dequantize(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Encode a shaded color for storage in an 8-bit RGBA pixel.
///
/// Channels are clamped to `[0, 1]`. With `srgb` set, R, G and B are
/// converted to display space; alpha is always stored linearly.
pub fn encode_color(color: Vec4, srgb: bool) -> [u8; 4] {
    let mut rgba = color.map(clamp01);
    if srgb {
        for c in 0..3 {
            rgba[c] = to_display(rgba[c]);
        }
    }
    [
        quantize(rgba.x),
        quantize(rgba.y),
        quantize(rgba.z),
        quantize(rgba.w),
    ]
}

/// Decode an 8-bit RGBA pixel to a linear color.
pub fn decode_color(pixel: [u8; 4], srgb: bool) -> Vec4 {
    let mut rgba = Vec4::new(
        dequantize(pixel[0]),
        dequantize(pixel[1]),
        dequantize(pixel[2]),
        dequantize(pixel[3]),
    );
    if srgb {
        for c in 0..3 {
            rgba[c] = to_linear(rgba[c]);
        }
    }
    rgba
}
