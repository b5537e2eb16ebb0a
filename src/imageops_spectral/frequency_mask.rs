//! Frequency-domain masks.
//!
//! Every mask is a pure function of a [`FrequencyGrid`] and the filter
//! parameters. Masks are real-valued planes in natural (unshifted) frequency
//! order, applied by elementwise multiplication. The boolean variants hold
//! exactly `0.0` and `1.0`.

use crate::error::MaskImageError;
use crate::imageops_spectral::frequency_grid::FrequencyGrid;
use crate::imageops_spectral::plane::{FrequencyPlane, Plane};
use crate::utils::quantize_u8;
use crate::Image;
use image::Luma;
use num_complex::Complex;
use std::f64::consts::PI;

/// Multiplicative weighting over a frequency plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask(Plane<f64>);

impl Mask {
    /// Wraps a real plane in natural frequency order.
    #[must_use]
    pub const fn new(plane: Plane<f64>) -> Self {
        Self(plane)
    }

    /// Mask that keeps every frequency.
    #[must_use]
    pub fn pass_all(width: u32, height: u32) -> Self {
        Self(Plane::from_elem(width, height, 1.0))
    }

    #[must_use]
    pub const fn plane(&self) -> &Plane<f64> {
        &self.0
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Weight at frequency index `(x, y)`.
    #[must_use]
    pub fn weight(&self, x: u32, y: u32) -> f64 {
        self.0.get(x, y)
    }

    /// Logical AND for 0/1 masks (pointwise minimum in general).
    ///
    /// # Errors
    ///
    /// * `MaskImageError::DimensionMismatch` - the masks differ in shape
    pub fn intersect(&self, other: &Self) -> Result<Self, MaskImageError> {
        self.check_dimensions(other.dimensions())?;
        Ok(Self(self.0.zip_map(&other.0, f64::min)))
    }

    /// Logical OR for 0/1 masks (pointwise maximum in general).
    ///
    /// # Errors
    ///
    /// * `MaskImageError::DimensionMismatch` - the masks differ in shape
    pub fn union(&self, other: &Self) -> Result<Self, MaskImageError> {
        self.check_dimensions(other.dimensions())?;
        Ok(Self(self.0.zip_map(&other.0, f64::max)))
    }

    /// `1 − m` at every frequency.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self(self.0.map(|v| 1.0 - v))
    }

    /// Number of frequencies with a non-zero weight.
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.0.data().iter().filter(|&&v| v != 0.0).count()
    }

    /// Builds a mask from a grayscale image.
    ///
    /// Intensities are normalized to `[0, 1]` and thresholded at `0.5`.
    /// When `centered` is set the image is read in display order (DC in the
    /// middle, as produced by the magnitude spectrum) and moved back to
    /// natural order.
    #[must_use]
    pub fn from_image(image: &Image<Luma<u8>>, centered: bool) -> Self {
        let (width, height) = image.dimensions();
        let plane = Plane::from_fn(width, height, |x, y| {
            let normalized = f64::from(image.get_pixel(x, y)[0]) / 255.0;
            if normalized >= 0.5 {
                1.0
            } else {
                0.0
            }
        });
        Self(if centered { plane.ifftshift() } else { plane })
    }

    /// Renders the mask as an 8-bit image, optionally centred for display.
    #[must_use]
    pub fn to_image(&self, centered: bool) -> Image<Luma<u8>> {
        let plane = if centered {
            self.0.fftshift()
        } else {
            self.0.clone()
        };
        Image::from_fn(plane.width(), plane.height(), |x, y| {
            Luma([quantize_u8(plane.get(x, y) * 255.0)])
        })
    }

    pub(crate) fn check_dimensions(&self, actual: (u32, u32)) -> Result<(), MaskImageError> {
        if self.dimensions() == actual {
            Ok(())
        } else {
            Err(MaskImageError::DimensionMismatch {
                expected: self.dimensions(),
                actual,
            })
        }
    }
}

/// Loads an auxiliary mask image through the codec.
///
/// # Errors
///
/// * `MaskImageError::Decode` - the file is missing or cannot be decoded
#[cfg(feature = "codecs")]
pub fn load_mask_image(
    path: impl AsRef<std::path::Path>,
    centered: bool,
) -> Result<Mask, MaskImageError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| MaskImageError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Mask::from_image(&image.to_luma8(), centered))
}

/// Builds a 0/1 mask from a predicate on the radial distance.
pub fn radial_mask(grid: &FrequencyGrid, keep: impl Fn(f64) -> bool) -> Mask {
    Mask(grid.distance().map(|d| if keep(d) { 1.0 } else { 0.0 }))
}

/// Keeps `distance ≤ cutoff`.
#[must_use]
pub fn low_pass(grid: &FrequencyGrid, cutoff: f64) -> Mask {
    radial_mask(grid, |d| d <= cutoff)
}

/// Keeps `distance ≥ cutoff`.
#[must_use]
pub fn high_pass(grid: &FrequencyGrid, cutoff: f64) -> Mask {
    radial_mask(grid, |d| d >= cutoff)
}

/// Keeps `low ≤ distance ≤ high`.
#[must_use]
pub fn band_pass(grid: &FrequencyGrid, low: f64, high: f64) -> Mask {
    radial_mask(grid, |d| low <= d && d <= high)
}

/// Keeps `distance < low` or `distance > high`; the complement of [`band_pass`].
#[must_use]
pub fn band_cut(grid: &FrequencyGrid, low: f64, high: f64) -> Mask {
    radial_mask(grid, |d| d < low || d > high)
}

/// Angular sector in degrees, measured counter-clockwise from the +U axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub min_degrees: f64,
    pub max_degrees: f64,
    /// Also keep the sector rotated by 180°
    pub mirror: bool,
}

impl AngleRange {
    #[must_use]
    pub const fn new(min_degrees: f64, max_degrees: f64) -> Self {
        Self {
            min_degrees,
            max_degrees,
            mirror: true,
        }
    }

    #[must_use]
    pub const fn without_mirror(self) -> Self {
        Self {
            mirror: false,
            ..self
        }
    }

    /// The same range rotated by 180°.
    #[must_use]
    pub fn rotated_half_turn(self) -> Self {
        Self {
            min_degrees: self.min_degrees + 180.0,
            max_degrees: self.max_degrees + 180.0,
            ..self
        }
    }

    fn span(self) -> f64 {
        let raw = self.max_degrees - self.min_degrees;
        if raw >= 360.0 {
            360.0
        } else {
            raw.rem_euclid(360.0)
        }
    }

    /// Whether `angle` (degrees in `[0, 360)`) falls in the range or its mirror.
    #[must_use]
    pub fn contains(self, angle: f64) -> bool {
        let span = self.span();
        let within = |start: f64| {
            span >= 360.0 || (angle - start.rem_euclid(360.0)).rem_euclid(360.0) <= span
        };
        within(self.min_degrees) || (self.mirror && within(self.min_degrees + 180.0))
    }
}

/// Keeps the frequencies whose angle falls in `range`.
///
/// A real image has a conjugate-symmetric spectrum, so an oriented feature
/// shows up at both θ and θ+180°; `range.mirror` adds the second sector.
/// The DC term carries no orientation and is always kept.
#[must_use]
pub fn directional(grid: &FrequencyGrid, range: AngleRange) -> Mask {
    Mask(grid.distance().zip_map(grid.angle_degrees(), |d, a| {
        if d == 0.0 || range.contains(a) {
            1.0
        } else {
            0.0
        }
    }))
}

/// Multiplies a frequency plane by a mask.
///
/// # Errors
///
/// * `MaskImageError::DimensionMismatch` - mask and plane differ in shape
pub fn apply_mask(spectrum: &FrequencyPlane, mask: &Mask) -> Result<FrequencyPlane, MaskImageError> {
    mask.check_dimensions(spectrum.dimensions())?;
    Ok(spectrum.zip_map(mask.plane(), |value, weight| value * weight))
}

/// Adds a linear phase ramp to every frequency.
///
/// The phase added at `(U, V)` is the angle of
/// `exp(i·(−k·2π·U/width − l·2π·V/height + (k+l)·π))`, while the magnitude is
/// kept. By the shift theorem this translates the spatial content by `(k, l)`
/// pixels and multiplies it by `(−1)^(k+l)`. `k = l = 0` is the identity.
///
/// # Errors
///
/// * `MaskImageError::DimensionMismatch` - grid and plane differ in shape
pub fn phase_shift(
    spectrum: &FrequencyPlane,
    grid: &FrequencyGrid,
    k: f64,
    l: f64,
) -> Result<FrequencyPlane, MaskImageError> {
    if grid.dimensions() != spectrum.dimensions() {
        return Err(MaskImageError::DimensionMismatch {
            expected: spectrum.dimensions(),
            actual: grid.dimensions(),
        });
    }

    let (width, height) = (f64::from(grid.width()), f64::from(grid.height()));
    Ok(Plane::from_fn(grid.width(), grid.height(), |x, y| {
        let value = spectrum.get(x, y);
        let exponent = -k * 2.0 * PI * grid.u(x) / width - l * 2.0 * PI * grid.v(y) / height
            + (k + l) * PI;
        let modified_phase = Complex::from_polar(1.0, exponent).arg();
        Complex::from_polar(value.norm(), value.arg() + modified_phase)
    }))
}
