//! Test utilities for imageops-spectral
//!
//! This module provides common fixtures for testing image operations.
//! It is only compiled when running tests.

use image::{Luma, Pixel, Primitive, Rgb};
use imageproc::definitions::Image;

/// Creates a 2x2 RGB image with known pixel values.
///
/// - (0,0): [200, 150, 100]
/// - (1,0): [100, 200, 150]
/// - (0,1): [150, 100, 200]
/// - (1,1): [50, 75, 25]
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([100, 200, 150]));
    image.put_pixel(0, 1, Rgb([150, 100, 200]));
    image.put_pixel(1, 1, Rgb([50, 75, 25]));
    image
}

/// Creates a 2x2 grayscale image: 200, 150 on the first row and 100, 50 on the second.
pub fn create_test_luma_image() -> Image<Luma<u8>> {
    let mut image: Image<Luma<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Luma([200]));
    image.put_pixel(1, 0, Luma([150]));
    image.put_pixel(0, 1, Luma([100]));
    image.put_pixel(1, 1, Luma([50]));
    image
}

/// `true` when every subpixel differs by at most `tolerance`.
pub fn pixels_approx_equal<P>(expected: P, actual: P, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    expected.channels().len() == actual.channels().len()
        && expected
            .channels()
            .iter()
            .zip(actual.channels())
            .all(|(&e, &a)| (f32::from(e) - f32::from(a)).abs() <= tolerance)
}

/// Compares two images pixel by pixel within `tolerance`.
///
/// Spectral round trips go through floating point and rounding, so exact
/// equality is too strict for reconstructed images.
pub fn images_approx_equal<P>(expected: &Image<P>, actual: &Image<P>, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    expected.dimensions() == actual.dimensions()
        && expected
            .pixels()
            .zip(actual.pixels())
            .all(|(e, a)| pixels_approx_equal(*e, *a, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_documented_values() {
        let rgb = create_test_rgb_image();
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([50, 75, 25]));
        assert_eq!(create_test_luma_image().get_pixel(0, 1), &Luma([100]));
    }

    #[test]
    fn approx_equality_respects_tolerance() {
        assert!(pixels_approx_equal(Rgb([100u8, 100, 100]), Rgb([101, 99, 100]), 1.0));
        assert!(!pixels_approx_equal(Rgb([100u8, 100, 100]), Rgb([103, 100, 100]), 2.0));

        let a = create_test_luma_image();
        let mut b = a.clone();
        b.put_pixel(0, 0, Luma([201]));
        assert!(images_approx_equal(&a, &b, 1.0));
        assert!(!images_approx_equal(&a, &b, 0.5));

        let smaller: Image<Luma<u8>> = Image::new(1, 1);
        assert!(!images_approx_equal(&a, &smaller, 255.0));
    }
}
