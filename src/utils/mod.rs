//! Internal utility functions for imageops-spectral.
//!
//! This module contains common functionality used across different image operations.

use image::{Pixel, Primitive};
use imageproc::definitions::Image;

/// Rounds a real value and clips it to the 8-bit intensity range.
///
/// # Arguments
///
/// * `value` - The value to quantize
///
/// # Returns
///
/// The nearest integer in `[0, 255]`. NaN maps to 0.
#[inline]
pub fn quantize_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Clips a real value to the 8-bit range and truncates toward zero.
///
/// Used by the filters that average in integer arithmetic, so that
/// their output matches floor division on non-negative data.
#[inline]
pub fn truncate_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Clamps a signed coordinate into `[0, len)`.
#[inline]
pub fn clamp_index(index: i64, len: u32) -> u32 {
    index.clamp(0, i64::from(len) - 1) as u32
}

/// Builds an image from a raw subpixel vector, failing instead of panicking
/// when the length does not match the dimensions.
pub fn image_from_raw<P>(width: u32, height: u32, raw: Vec<P::Subpixel>) -> Option<Image<P>>
where
    P: Pixel,
    P::Subpixel: Primitive,
{
    Image::from_raw(width, height, raw)
}
