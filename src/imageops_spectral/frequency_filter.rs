//! Frequency-domain filtering pipeline.
//!
//! `image → per-channel forward transform → mask or phase shift → inverse
//! transform → clip and round → image`. The spectrum stays in natural
//! frequency order the whole way; only the magnitude view is centred.

use crate::error::{FilterError, MaskImageError, TransformError};
use crate::imageops_spectral::fourier::TransformVariant;
use crate::imageops_spectral::frequency_grid::FrequencyGrid;
use crate::imageops_spectral::frequency_mask::{
    apply_mask, band_cut, band_pass, directional, high_pass, low_pass, phase_shift, AngleRange,
    Mask,
};
use crate::imageops_spectral::plane::{
    merge_channels, split_channels, ChannelPlane, FrequencyPlane,
};
use crate::imageops_spectral::transform_2d::{forward_2d, inverse_2d, magnitude_spectrum};
use crate::Image;
use image::Pixel;
use std::fmt;
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-channel frequency planes of one image.
///
/// Channels are kept as parallel planes and never interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    channels: Vec<FrequencyPlane>,
    variant: TransformVariant,
}

impl Spectrum {
    /// Forward-transforms each channel plane independently.
    ///
    /// # Errors
    ///
    /// * `TransformError::ChannelCountMismatch` - no planes were given
    /// * `TransformError::DimensionMismatch` - planes disagree on their shape
    /// * `TransformError::EmptyPlane` / `TransformError::InvalidDimension` - see [`forward_2d`]
    pub fn forward(planes: &[ChannelPlane], variant: TransformVariant) -> Result<Self, TransformError> {
        let Some(first) = planes.first() else {
            return Err(TransformError::ChannelCountMismatch {
                expected: 1,
                actual: 0,
            });
        };
        let (width, height) = first.dimensions();
        if let Some(bad) = planes.iter().find(|p| p.dimensions() != (width, height)) {
            return Err(TransformError::DimensionMismatch {
                width,
                height,
                actual: bad.len(),
            });
        }

        #[cfg(feature = "rayon")]
        let channels = planes
            .par_iter()
            .map(|plane| forward_2d(plane, variant))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "rayon"))]
        let channels = planes
            .iter()
            .map(|plane| forward_2d(plane, variant))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { channels, variant })
    }

    /// Splits an 8-bit image into channels and forward-transforms them.
    ///
    /// # Errors
    ///
    /// See [`Spectrum::forward`].
    pub fn from_image<P>(image: &Image<P>, variant: TransformVariant) -> Result<Self, TransformError>
    where
        P: Pixel<Subpixel = u8>,
    {
        Self::forward(&split_channels(image), variant)
    }

    #[must_use]
    pub fn channels(&self) -> &[FrequencyPlane] {
        &self.channels
    }

    #[must_use]
    pub const fn variant(&self) -> TransformVariant {
        self.variant
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.channels[0].dimensions()
    }

    /// Frequency grid matching this spectrum's shape.
    #[must_use]
    pub fn grid(&self) -> FrequencyGrid {
        let (width, height) = self.dimensions();
        FrequencyGrid::new(width, height)
    }

    /// Multiplies every channel by `mask`.
    ///
    /// # Errors
    ///
    /// * `MaskImageError::DimensionMismatch` - mask and spectrum differ in shape
    pub fn apply_mask(&self, mask: &Mask) -> Result<Self, MaskImageError> {
        self.map_channels(|plane| apply_mask(plane, mask))
    }

    /// Applies the `(k, l)` phase ramp to every channel.
    ///
    /// # Errors
    ///
    /// * `MaskImageError::DimensionMismatch` - grid and spectrum differ in shape
    pub fn apply_phase_shift(&self, grid: &FrequencyGrid, k: f64, l: f64) -> Result<Self, MaskImageError> {
        self.map_channels(|plane| phase_shift(plane, grid, k, l))
    }

    fn map_channels(
        &self,
        f: impl Fn(&FrequencyPlane) -> Result<FrequencyPlane, MaskImageError>,
    ) -> Result<Self, MaskImageError> {
        Ok(Self {
            channels: self.channels.iter().map(f).collect::<Result<_, _>>()?,
            variant: self.variant,
        })
    }

    /// Centred `log(1 + |F|)` views scaled to `[0, 255]`, one per channel.
    #[must_use]
    pub fn magnitude_planes(&self) -> Vec<ChannelPlane> {
        self.channels.iter().map(magnitude_spectrum).collect()
    }

    /// Magnitude views assembled into an image for inspection.
    ///
    /// # Errors
    ///
    /// * `TransformError::ChannelCountMismatch` - `P` does not match the channel count
    pub fn magnitude_image<P>(&self) -> Result<Image<P>, TransformError>
    where
        P: Pixel<Subpixel = u8>,
    {
        merge_channels(&self.magnitude_planes())
    }

    /// Inverse-transforms each channel and keeps the real parts, unclipped.
    ///
    /// # Errors
    ///
    /// See [`inverse_2d`].
    pub fn inverse_planes(&self) -> Result<Vec<ChannelPlane>, TransformError> {
        #[cfg(feature = "rayon")]
        let planes = self
            .channels
            .par_iter()
            .map(|plane| inverse_2d(plane, self.variant))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let planes = self
            .channels
            .iter()
            .map(|plane| inverse_2d(plane, self.variant))
            .collect();

        planes
    }

    /// Inverse-transforms, clips to `[0, 255]`, rounds and reassembles the image.
    ///
    /// # Errors
    ///
    /// See [`Spectrum::inverse_planes`] and [`merge_channels`].
    pub fn reconstruct<P>(&self) -> Result<Image<P>, TransformError>
    where
        P: Pixel<Subpixel = u8>,
    {
        merge_channels(&self.inverse_planes()?)
    }
}

/// Frequency filter family with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyFilter {
    /// Keep `distance ≤ cutoff`
    LowPass { cutoff: f64 },
    /// Keep `distance ≥ cutoff`
    HighPass { cutoff: f64 },
    /// Keep `low ≤ distance ≤ high`
    BandPass { low: f64, high: f64 },
    /// Remove `low ≤ distance ≤ high`
    BandCut { low: f64, high: f64 },
    /// Keep an angular sector (and its mirror)
    Directional(AngleRange),
    /// Linear phase ramp; magnitudes untouched
    PhaseShift { k: f64, l: f64 },
}

impl FrequencyFilter {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LowPass { .. } => "low-pass",
            Self::HighPass { .. } => "high-pass",
            Self::BandPass { .. } => "band-pass",
            Self::BandCut { .. } => "band-cut",
            Self::Directional(_) => "directional",
            Self::PhaseShift { .. } => "phase-shift",
        }
    }

    /// Checks the parameters before any transform runs.
    ///
    /// Cutoffs may be `+∞` (an all-pass low-pass) but not negative or NaN.
    ///
    /// # Errors
    ///
    /// * `FilterError::InvalidParameter` - a parameter is out of range
    pub fn validate(&self) -> Result<(), FilterError> {
        let radius = |name: &str, value: f64| {
            if value.is_nan() || value < 0.0 {
                Err(FilterError::InvalidParameter(format!(
                    "{name} must be a non-negative radius, got {value}"
                )))
            } else {
                Ok(())
            }
        };
        let finite = |name: &str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(FilterError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )))
            }
        };

        match *self {
            Self::LowPass { cutoff } | Self::HighPass { cutoff } => radius("cutoff", cutoff),
            Self::BandPass { low, high } | Self::BandCut { low, high } => {
                radius("low", low)?;
                radius("high", high)?;
                if low > high {
                    return Err(FilterError::InvalidParameter(format!(
                        "band lower bound {low} exceeds upper bound {high}"
                    )));
                }
                Ok(())
            }
            Self::Directional(range) => {
                finite("min angle", range.min_degrees)?;
                finite("max angle", range.max_degrees)
            }
            Self::PhaseShift { k, l } => {
                finite("k", k)?;
                finite("l", l)
            }
        }
    }

    /// Multiplicative mask for this filter, or `None` for the phase shift.
    #[must_use]
    pub fn mask(&self, grid: &FrequencyGrid) -> Option<Mask> {
        match *self {
            Self::LowPass { cutoff } => Some(low_pass(grid, cutoff)),
            Self::HighPass { cutoff } => Some(high_pass(grid, cutoff)),
            Self::BandPass { low, high } => Some(band_pass(grid, low, high)),
            Self::BandCut { low, high } => Some(band_cut(grid, low, high)),
            Self::Directional(range) => Some(directional(grid, range)),
            Self::PhaseShift { .. } => None,
        }
    }
}

/// Everything produced by one frequency filter run.
#[derive(Clone)]
pub struct FilterOutput<P: Pixel> {
    /// Reconstructed image
    pub image: Image<P>,
    /// Spectrum of the input
    pub spectrum: Spectrum,
    /// Spectrum after masking or phase shifting
    pub filtered_spectrum: Spectrum,
    /// Effective mask (filter mask AND auxiliary mask), if any
    pub mask: Option<Mask>,
}

// `Image<P>` is `Debug` only when the subpixel type is too.
impl<P> fmt::Debug for FilterOutput<P>
where
    P: Pixel + fmt::Debug,
    P::Subpixel: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOutput")
            .field("image", &self.image)
            .field("spectrum", &self.spectrum)
            .field("filtered_spectrum", &self.filtered_spectrum)
            .field("mask", &self.mask)
            .finish()
    }
}

/// 周波数領域フィルタを適用するトレイト
pub trait FrequencyFilterExt {
    /// フィルタ処理の出力型
    type Output;

    /// フィルタ処理で発生する可能性のあるエラー型
    type Error;

    /// 周波数領域フィルタを適用する
    ///
    /// # 引数
    ///
    /// * `filter` - フィルタの種類とパラメータ
    /// * `extra_mask` - 追加のマスク（フィルタのマスクと論理積をとる）
    /// * `variant` - 変換の実装（`Fast` は2のべき乗サイズのみ）
    ///
    /// # エラー
    ///
    /// * パラメータが不正な場合
    /// * `Fast` で2のべき乗でないサイズを渡した場合
    /// * マスクのサイズが画像と一致しない場合
    fn frequency_filter(
        &self,
        filter: &FrequencyFilter,
        extra_mask: Option<&Mask>,
        variant: TransformVariant,
    ) -> Result<Self::Output, Self::Error>;
}

impl<P> FrequencyFilterExt for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    type Output = FilterOutput<P>;
    type Error = FilterError;

    fn frequency_filter(
        &self,
        filter: &FrequencyFilter,
        extra_mask: Option<&Mask>,
        variant: TransformVariant,
    ) -> Result<Self::Output, Self::Error> {
        filter.validate()?;

        let spectrum = Spectrum::from_image(self, variant)?;
        let grid = spectrum.grid();

        let mask = match (filter.mask(&grid), extra_mask) {
            (Some(own), Some(extra)) => Some(own.intersect(extra)?),
            (Some(own), None) => Some(own),
            (None, Some(extra)) => Some(extra.clone()),
            (None, None) => None,
        };

        let mut filtered = match *filter {
            FrequencyFilter::PhaseShift { k, l } => spectrum.apply_phase_shift(&grid, k, l)?,
            _ => spectrum.clone(),
        };
        if let Some(mask) = &mask {
            filtered = filtered.apply_mask(mask)?;
        }

        debug!(
            filter = filter.name(),
            width = grid.width(),
            height = grid.height(),
            channels = spectrum.channels().len(),
            passed = mask.as_ref().map(Mask::pass_count),
            "frequency filter applied"
        );

        let image = filtered.reconstruct()?;
        Ok(FilterOutput {
            image,
            spectrum,
            filtered_spectrum: filtered,
            mask,
        })
    }
}
