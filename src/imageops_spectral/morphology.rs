//! Binary morphology.
//!
//! Every operator is a pure function `plane × kernel → plane` of the same
//! shape. Only the foreground cells of a structuring element take part in
//! dilation and erosion; background and don't-care cells are skipped.
//! Dilation reads outside the image as background, erosion as foreground
//! unless told otherwise.

use crate::error::{KernelError, MorphologyError};
use crate::imageops_spectral::plane::{BinaryPlane, Plane};
use crate::imageops_spectral::structuring_element::{KernelCell, StructuringElement};
use crate::Image;
use image::Luma;
use tracing::debug;

/// Value assumed for pixels outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderValue {
    Background,
    Foreground,
}

impl BorderValue {
    const fn value(self) -> u8 {
        match self {
            Self::Background => 0,
            Self::Foreground => 1,
        }
    }
}

impl Plane<u8> {
    /// Binarizes a grayscale image: `1` where the intensity is at least `threshold`.
    #[must_use]
    pub fn from_luma(image: &Image<Luma<u8>>, threshold: u8) -> Self {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| {
            u8::from(image.get_pixel(x, y)[0] >= threshold)
        })
    }

    /// Renders `0/1` as `0/255`.
    #[must_use]
    pub fn to_luma(&self) -> Image<Luma<u8>> {
        Image::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.get(x, y) != 0 { 255 } else { 0 }])
        })
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn count_foreground(&self) -> usize {
        self.data().iter().filter(|&&v| v != 0).count()
    }
}

fn sample(image: &BinaryPlane, x: u32, y: u32, offset: (i64, i64), border: BorderValue) -> u8 {
    image
        .get_signed(i64::from(x) + offset.0, i64::from(y) + offset.1)
        .unwrap_or_else(|| border.value())
}

/// Sets a pixel when any foreground kernel cell, centred there, covers a foreground pixel.
#[must_use]
pub fn dilation(image: &BinaryPlane, kernel: &StructuringElement) -> BinaryPlane {
    let offsets = kernel.offsets(KernelCell::Foreground);
    Plane::from_fn(image.width(), image.height(), |x, y| {
        u8::from(
            offsets
                .iter()
                .any(|&offset| sample(image, x, y, offset, BorderValue::Background) == 1),
        )
    })
}

/// Keeps a pixel when every foreground kernel cell, centred there, covers a
/// foreground pixel. The border reads as foreground.
#[must_use]
pub fn erosion(image: &BinaryPlane, kernel: &StructuringElement) -> BinaryPlane {
    erosion_with_border(image, kernel, BorderValue::Foreground)
}

/// Erosion with an explicit border value.
#[must_use]
pub fn erosion_with_border(
    image: &BinaryPlane,
    kernel: &StructuringElement,
    border: BorderValue,
) -> BinaryPlane {
    let offsets = kernel.offsets(KernelCell::Foreground);
    Plane::from_fn(image.width(), image.height(), |x, y| {
        u8::from(
            offsets
                .iter()
                .all(|&offset| sample(image, x, y, offset, border) == 1),
        )
    })
}

/// Erosion followed by dilation with the reflected kernel, `(X ⊖ K) ⊕ K`.
///
/// The result is a subset of `image` whenever the kernel anchor is foreground.
#[must_use]
pub fn opening(image: &BinaryPlane, kernel: &StructuringElement) -> BinaryPlane {
    dilation(&erosion(image, kernel), &kernel.reflected())
}

/// Dilation with the reflected kernel followed by erosion, `(X ⊕ K) ⊖ K`.
///
/// The result is a superset of `image` whenever the kernel anchor is foreground.
#[must_use]
pub fn closing(image: &BinaryPlane, kernel: &StructuringElement) -> BinaryPlane {
    erosion(&dilation(image, &kernel.reflected()), kernel)
}

/// Logical NOT.
#[must_use]
pub fn complement(image: &BinaryPlane) -> BinaryPlane {
    image.map(|v| u8::from(v == 0))
}

/// Logical AND of two planes.
///
/// # Errors
///
/// * `MorphologyError::DimensionMismatch` - the planes differ in shape
pub fn intersection(a: &BinaryPlane, b: &BinaryPlane) -> Result<BinaryPlane, MorphologyError> {
    if a.dimensions() != b.dimensions() {
        return Err(MorphologyError::DimensionMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        });
    }
    Ok(a.zip_map(b, |p, q| u8::from(p != 0 && q != 0)))
}

/// Hit-or-miss transform.
///
/// Erodes the image with `foreground`, and the complement of the image with
/// `background` when one is given; the result is the AND of both.
#[must_use]
pub fn hit_or_miss(
    image: &BinaryPlane,
    foreground: &StructuringElement,
    background: Option<&StructuringElement>,
) -> BinaryPlane {
    let hits = erosion(image, foreground);
    match background {
        Some(background) => {
            let misses = erosion(&complement(image), background);
            hits.zip_map(&misses, |p, q| p & q)
        }
        None => hits,
    }
}

/// Hit-or-miss with a single ternary template.
///
/// Foreground cells must match foreground, background cells must match
/// background, and don't-care cells are ignored.
#[must_use]
pub fn hit_or_miss_template(image: &BinaryPlane, template: &StructuringElement) -> BinaryPlane {
    hit_or_miss(
        image,
        &template.foreground_kernel(),
        Some(&template.background_kernel()),
    )
}

/// Conditional dilation from a seed, bounded by `image`.
///
/// Starting from `X₀ = {seed}`, repeats `Xₖ₊₁ = dilation(Xₖ) ∩ image` until
/// the set stops changing. With a connected kernel such as [`StructuringElement::cross`]
/// (4-connectivity) or a 3×3 square (8-connectivity) the result is the
/// connected component containing the seed. A background seed yields the
/// union of the components touching its neighbourhood.
///
/// # Errors
///
/// * `MorphologyError::SeedOutOfBounds` - the seed lies outside the image
/// * `MorphologyError::Kernel` - the kernel anchor is not foreground; the
///   iteration would not be monotonic and might never settle
pub fn iterative_dilation(
    image: &BinaryPlane,
    seed: (u32, u32),
    kernel: &StructuringElement,
) -> Result<BinaryPlane, MorphologyError> {
    let (width, height) = image.dimensions();
    let (x, y) = seed;
    if x >= width || y >= height {
        return Err(MorphologyError::SeedOutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    if !kernel.contains_anchor() {
        return Err(KernelError::InvalidValue(
            "iterative dilation requires a foreground anchor cell".to_string(),
        )
        .into());
    }

    let mut current = Plane::from_elem(width, height, 0u8);
    current.set(x, y, 1);

    let mut iterations = 0usize;
    loop {
        iterations += 1;
        let next = dilation(&current, kernel).zip_map(image, |p, q| p & q);
        if next == current {
            break;
        }
        current = next;
    }

    debug!(
        seed_x = x,
        seed_y = y,
        iterations,
        size = current.count_foreground(),
        "iterative dilation converged"
    );
    Ok(current)
}
