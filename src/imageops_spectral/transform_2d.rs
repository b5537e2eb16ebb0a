//! Separable two-dimensional Fourier transform.
//!
//! The forward transform runs the 1D primitive over every row and then over
//! every column of the row result. The inverse undoes the passes in reverse
//! order (columns, then rows). Columns are processed by transposing, running
//! the row pass and transposing back, so a column pass never starts before
//! the preceding row pass has finished.

use crate::error::TransformError;
use crate::imageops_spectral::fourier::{Direction, TransformVariant};
use crate::imageops_spectral::plane::{ChannelPlane, FrequencyPlane};
use num_complex::Complex;
use tracing::{debug, trace};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Transforms a complex plane in the given direction.
///
/// # Errors
///
/// * `TransformError::EmptyPlane` - the plane has a zero dimension
/// * `TransformError::InvalidDimension` - `Fast` variant with a non power-of-two axis
pub fn transform_2d(
    plane: &FrequencyPlane,
    direction: Direction,
    variant: TransformVariant,
) -> Result<FrequencyPlane, TransformError> {
    validate_plane(plane.width(), plane.height(), variant)?;
    debug!(
        width = plane.width(),
        height = plane.height(),
        ?direction,
        ?variant,
        "2D transform"
    );

    match direction {
        Direction::Forward => {
            let rows = transform_rows(plane, direction, variant)?;
            transform_columns(&rows, direction, variant)
        }
        Direction::Inverse => {
            let columns = transform_columns(plane, direction, variant)?;
            transform_rows(&columns, direction, variant)
        }
    }
}

/// Forward transform of a real channel plane.
///
/// # Errors
///
/// See [`transform_2d`].
pub fn forward_2d(
    plane: &ChannelPlane,
    variant: TransformVariant,
) -> Result<FrequencyPlane, TransformError> {
    let complex = plane.map(|v| Complex::new(v, 0.0));
    transform_2d(&complex, Direction::Forward, variant)
}

/// Inverse transform keeping only the real part.
///
/// The imaginary residue is negligible for conjugate-symmetric spectra and
/// is discarded in every case.
///
/// # Errors
///
/// See [`transform_2d`].
pub fn inverse_2d(
    spectrum: &FrequencyPlane,
    variant: TransformVariant,
) -> Result<ChannelPlane, TransformError> {
    let spatial = transform_2d(spectrum, Direction::Inverse, variant)?;
    Ok(spatial.map(|v| v.re))
}

/// `log(1 + |F|)` rescaled to `[0, 255]` and shifted so that DC sits in the centre.
///
/// The result is for display only and never goes back into an inverse transform.
pub fn magnitude_spectrum(spectrum: &FrequencyPlane) -> ChannelPlane {
    let log_magnitude = spectrum.map(|v| v.norm().ln_1p());
    let max = log_magnitude.data().iter().copied().fold(0.0, f64::max);
    let scaled = if max > 0.0 {
        log_magnitude.map(|v| v / max * 255.0)
    } else {
        log_magnitude
    };
    scaled.fftshift()
}

fn validate_plane(width: u32, height: u32, variant: TransformVariant) -> Result<(), TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::EmptyPlane { width, height });
    }
    variant.validate_length(width as usize)?;
    variant.validate_length(height as usize)?;
    Ok(())
}

fn transform_rows(
    plane: &FrequencyPlane,
    direction: Direction,
    variant: TransformVariant,
) -> Result<FrequencyPlane, TransformError> {
    let width = plane.width() as usize;
    trace!(rows = plane.height(), width, "row pass");

    let mut output = plane.clone();
    let process = |row: &mut [Complex<f64>]| -> Result<(), TransformError> {
        let transformed = variant.apply(row, direction)?;
        row.copy_from_slice(&transformed);
        Ok(())
    };

    #[cfg(feature = "rayon")]
    output.data_mut().par_chunks_mut(width).try_for_each(process)?;

    #[cfg(not(feature = "rayon"))]
    output.data_mut().chunks_mut(width).try_for_each(process)?;

    Ok(output)
}

fn transform_columns(
    plane: &FrequencyPlane,
    direction: Direction,
    variant: TransformVariant,
) -> Result<FrequencyPlane, TransformError> {
    let transposed = plane.transpose();
    Ok(transform_rows(&transposed, direction, variant)?.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imageops_spectral::plane::Plane;

    fn test_plane(width: u32, height: u32) -> ChannelPlane {
        Plane::from_fn(width, height, |x, y| f64::from((x * 7 + y * 13) % 31))
    }

    fn max_abs_diff(a: &ChannelPlane, b: &ChannelPlane) -> f64 {
        a.data()
            .iter()
            .zip(b.data())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn fast_and_naive_agree() {
        let plane = test_plane(8, 4);
        let fast = forward_2d(&plane, TransformVariant::Fast).unwrap();
        let naive = forward_2d(&plane, TransformVariant::Naive).unwrap();
        for (a, b) in fast.data().iter().zip(naive.data()) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn dc_term_is_sum_of_pixels() {
        let plane = test_plane(4, 4);
        let sum: f64 = plane.data().iter().sum();
        let spectrum = forward_2d(&plane, TransformVariant::Fast).unwrap();
        assert!((spectrum.get(0, 0).re - sum).abs() < 1e-9);
        assert!(spectrum.get(0, 0).im.abs() < 1e-9);
    }

    #[test]
    fn round_trip_recovers_plane() {
        for (variant, width, height) in [
            (TransformVariant::Fast, 16, 8),
            (TransformVariant::Naive, 6, 5),
        ] {
            let plane = test_plane(width, height);
            let spectrum = forward_2d(&plane, variant).unwrap();
            let restored = inverse_2d(&spectrum, variant).unwrap();
            assert!(max_abs_diff(&plane, &restored) < 1e-9);
        }
    }

    #[test]
    fn rectangular_plane_keeps_orientation() {
        // A transpose artifact would swap the axes of a non-square plane.
        let plane = test_plane(8, 2);
        let spectrum = forward_2d(&plane, TransformVariant::Fast).unwrap();
        assert_eq!(spectrum.dimensions(), (8, 2));
        let restored = inverse_2d(&spectrum, TransformVariant::Fast).unwrap();
        assert_eq!(restored.dimensions(), (8, 2));
        assert!(max_abs_diff(&plane, &restored) < 1e-9);
    }

    #[test]
    fn fast_rejects_non_power_of_two_axis() {
        let plane = test_plane(8, 6);
        assert_eq!(
            forward_2d(&plane, TransformVariant::Fast).unwrap_err(),
            TransformError::InvalidDimension { length: 6 }
        );
        assert!(forward_2d(&plane, TransformVariant::Naive).is_ok());
    }

    #[test]
    fn empty_plane_is_rejected() {
        let plane: ChannelPlane = Plane::from_elem(0, 4, 0.0);
        assert_eq!(
            forward_2d(&plane, TransformVariant::Naive).unwrap_err(),
            TransformError::EmptyPlane {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn magnitude_spectrum_is_centered_and_scaled() {
        let plane = Plane::from_elem(8, 8, 10.0);
        let spectrum = forward_2d(&plane, TransformVariant::Fast).unwrap();
        let magnitude = magnitude_spectrum(&spectrum);
        assert!((magnitude.get(4, 4) - 255.0).abs() < 1e-9);
        assert!(magnitude.get(0, 0).abs() < 1e-9);
    }

    #[test]
    fn magnitude_spectrum_of_zero_plane_is_zero() {
        let plane = Plane::from_elem(4, 4, 0.0);
        let spectrum = forward_2d(&plane, TransformVariant::Fast).unwrap();
        let magnitude = magnitude_spectrum(&spectrum);
        assert!(magnitude.data().iter().all(|&v| v == 0.0));
    }
}
