//! Similarity measures between an original image and a processed one.

use crate::error::MetricsError;
use crate::Image;
use image::Pixel;

const PEAK: f64 = 255.0;

/// All similarity measures for one image pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    /// Mean square error over every subpixel
    pub mse: f64,
    /// `mse / 255²`
    pub pmse: f64,
    /// `10·log10(mean(original²) / mse)` dB, `+∞` when `mse == 0`
    pub snr: f64,
    /// `10·log10(255² / mse)` dB, `+∞` when `mse == 0`
    pub psnr: f64,
    /// Largest absolute subpixel difference
    pub max_difference: u8,
}

fn validate_pair<P: Pixel>(original: &Image<P>, modified: &Image<P>) -> Result<(), MetricsError> {
    if original.dimensions() != modified.dimensions() {
        return Err(MetricsError::DimensionMismatch {
            expected: original.dimensions(),
            actual: modified.dimensions(),
        });
    }
    if original.is_empty() {
        return Err(MetricsError::EmptyImage);
    }
    Ok(())
}

fn subpixel_pairs<'a, P>(
    original: &'a Image<P>,
    modified: &'a Image<P>,
) -> impl Iterator<Item = (f64, f64)> + 'a
where
    P: Pixel<Subpixel = u8>,
{
    original
        .as_raw()
        .iter()
        .zip(modified.as_raw())
        .map(|(&o, &m)| (f64::from(o), f64::from(m)))
}

fn decibels(ratio_numerator: f64, mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (ratio_numerator / mse).log10()
    }
}

/// Image comparison measures.
pub trait SimilarityMeasures {
    /// Compares `self` (the original) with `modified`.
    ///
    /// # Errors
    ///
    /// * `MetricsError::DimensionMismatch` - the images differ in shape
    /// * `MetricsError::EmptyImage` - the images have no pixels
    fn similarity(&self, modified: &Self) -> Result<Similarity, MetricsError>;
}

impl<P> SimilarityMeasures for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn similarity(&self, modified: &Self) -> Result<Similarity, MetricsError> {
        validate_pair(self, modified)?;
        let count = self.as_raw().len() as f64;

        let (squared_error, signal_power, max_difference) = subpixel_pairs(self, modified).fold(
            (0.0, 0.0, 0.0_f64),
            |(error, signal, max), (o, m)| {
                let difference = o - m;
                (
                    error + difference * difference,
                    signal + o * o,
                    max.max(difference.abs()),
                )
            },
        );

        let mse = squared_error / count;
        Ok(Similarity {
            mse,
            pmse: mse / (PEAK * PEAK),
            snr: decibels(signal_power / count, mse),
            psnr: decibels(PEAK * PEAK, mse),
            max_difference: max_difference as u8,
        })
    }
}
