//! Typed operations built from string-keyed parameters.
//!
//! A command-line front end hands over a `key → value` mapping; this module
//! turns it into an [`Operation`] and runs it on a [`PixelBuffer`].
//!
//! | `operation`          | parameters                                                        |
//! |----------------------|-------------------------------------------------------------------|
//! | `lowpass`/`highpass` | `cutoff`, `variant`                                               |
//! | `bandpass`/`bandcut` | `low`, `high`, `variant`                                          |
//! | `directional`        | `min_angle`, `max_angle`, `mirror` (default `true`), `variant`    |
//! | `phase`              | `k`, `l`, `variant`                                               |
//! | `dilation`/`erosion`/`opening`/`closing` | `kernel` (default `cross`), `threshold`       |
//! | `hmt`                | `template` (e.g. `-1,0,-1;0,1,0;-1,0,-1`), `threshold`            |
//! | `iterative_dilation` | `seed` (`x,y`), `kernel`, `threshold`                             |
//! | `region_growing`     | `seeds` (`x,y;x,y`), `threshold`, `connectivity`, `criterion`, `window` |
//! | `convolution`        | `filter` (`N`/`NE`/`E`/`SE`) or `custom_mask` (9 values)          |
//! | `roberts`            | none                                                              |
//! | `alpha`              | `size` (default 3), `alpha` (default 1)                           |
//! | `gmean`              | `size` (default 3)                                                |
//! | `hpower`             | `g_min` (default 0), `g_max` (default 255)                        |

use crate::error::{ConfigError, Error, FilterError};
use crate::imageops_spectral::fourier::TransformVariant;
use crate::imageops_spectral::frequency_filter::{FrequencyFilter, FrequencyFilterExt};
use crate::imageops_spectral::frequency_mask::{AngleRange, Mask};
use crate::imageops_spectral::morphology::{
    closing, dilation, erosion, hit_or_miss_template, iterative_dilation, opening,
};
use crate::imageops_spectral::noise_removal::NoiseRemoval;
use crate::imageops_spectral::pixel_buffer::PixelBuffer;
use crate::imageops_spectral::plane::{BinaryPlane, LabelPlane};
use crate::imageops_spectral::region_growing::{
    Connectivity, HomogeneityCriterion, RegionGrowing, RegionGrowingOptions, Seed,
};
use crate::imageops_spectral::spatial_filter::{ConvolutionKernel, DetailMask, SpatialFilter};
use crate::imageops_spectral::statistics::HistogramImprovement;
use crate::imageops_spectral::structuring_element::StructuringElement;
use crate::Image;
use image::{Luma, Pixel};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// Binarization threshold used when none is given.
const DEFAULT_BINARY_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyOp {
    Dilation,
    Erosion,
    Opening,
    Closing,
}

impl MorphologyOp {
    #[must_use]
    pub fn apply(self, image: &BinaryPlane, kernel: &StructuringElement) -> BinaryPlane {
        match self {
            Self::Dilation => dilation(image, kernel),
            Self::Erosion => erosion(image, kernel),
            Self::Opening => opening(image, kernel),
            Self::Closing => closing(image, kernel),
        }
    }
}

/// One configured image operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Frequency {
        filter: FrequencyFilter,
        variant: TransformVariant,
    },
    Morphology {
        op: MorphologyOp,
        kernel: StructuringElement,
        threshold: u8,
    },
    HitOrMiss {
        template: StructuringElement,
        threshold: u8,
    },
    IterativeDilation {
        seed: (u32, u32),
        kernel: StructuringElement,
        threshold: u8,
    },
    RegionGrowing {
        seeds: Vec<Seed>,
        options: RegionGrowingOptions,
    },
    Convolution(ConvolutionKernel),
    Roberts,
    AlphaTrimmedMean {
        size: u32,
        alpha: usize,
    },
    GeometricMean {
        size: u32,
    },
    PowerTwoThirds {
        g_min: u8,
        g_max: u8,
    },
}

/// Result of [`Operation::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Frequency {
        image: PixelBuffer,
        /// Centred magnitude spectrum of the input
        magnitude: PixelBuffer,
        /// Effective mask rendered for display
        mask: Option<Image<Luma<u8>>>,
    },
    Binary(BinaryPlane),
    Labels(LabelPlane),
    Image(PixelBuffer),
}

impl OperationOutput {
    /// The main result as an 8-bit image.
    #[must_use]
    pub fn primary_image(&self) -> PixelBuffer {
        match self {
            Self::Frequency { image, .. } | Self::Image(image) => image.clone(),
            Self::Binary(plane) => PixelBuffer::Luma(plane.to_luma()),
            Self::Labels(labels) => PixelBuffer::Luma(labels.labels_to_luma()),
        }
    }
}

fn value<'a>(args: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ConfigError> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingParameter(key.to_string()))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(args: &HashMap<String, String>, key: &str) -> Result<T, ConfigError> {
    let text = value(args, key)?;
    text.trim().parse().map_err(|_| invalid(key, text))
}

fn parse_or<T: FromStr>(args: &HashMap<String, String>, key: &str, default: T) -> Result<T, ConfigError> {
    if args.contains_key(key) {
        parse(args, key)
    } else {
        Ok(default)
    }
}

fn parse_point(key: &str, text: &str) -> Result<(u32, u32), ConfigError> {
    let (x, y) = text.split_once(',').ok_or_else(|| invalid(key, text))?;
    match (x.trim().parse(), y.trim().parse()) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(invalid(key, text)),
    }
}

fn parse_kernel(args: &HashMap<String, String>, key: &str) -> Result<StructuringElement, ConfigError> {
    match args.get(key).map(String::as_str) {
        None | Some("cross") => Ok(StructuringElement::cross()),
        Some("square") => Ok(StructuringElement::square(3)?),
        Some(matrix) => Ok(StructuringElement::parse(matrix)?),
    }
}

fn parse_variant(args: &HashMap<String, String>) -> Result<TransformVariant, ConfigError> {
    match args.get("variant").map(String::as_str) {
        None | Some("fast") => Ok(TransformVariant::Fast),
        Some("naive") => Ok(TransformVariant::Naive),
        Some(other) => Err(invalid("variant", other)),
    }
}

fn parse_region_options(args: &HashMap<String, String>) -> Result<RegionGrowingOptions, ConfigError> {
    let connectivity = match args.get("connectivity").map(String::as_str) {
        None | Some("4") => Connectivity::Four,
        Some("8") => Connectivity::Eight,
        Some(other) => return Err(invalid("connectivity", other)),
    };
    let criterion = match args.get("criterion").map(String::as_str) {
        None | Some("intensity") => HomogeneityCriterion::Intensity,
        Some("relative") => HomogeneityCriterion::Relative,
        Some("texture") => HomogeneityCriterion::Texture {
            window: parse_or(args, "window", 3)?,
        },
        Some(other) => return Err(invalid("criterion", other)),
    };
    Ok(RegionGrowingOptions::new(parse_or(args, "threshold", 10.0)?)
        .with_connectivity(connectivity)
        .with_criterion(criterion))
}

impl Operation {
    /// Builds an operation from the `operation` key and its parameters.
    ///
    /// # Errors
    ///
    /// * `ConfigError::MissingParameter` - a required key is absent
    /// * `ConfigError::InvalidParameter` - a value cannot be parsed
    /// * `ConfigError::UnknownOperation` - the operation name is not recognized
    /// * `ConfigError::Kernel` - a kernel or mask is malformed
    pub fn from_args(args: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let name = value(args, "operation")?;
        let frequency = |filter: FrequencyFilter| -> Result<Self, ConfigError> {
            Ok(Self::Frequency {
                filter,
                variant: parse_variant(args)?,
            })
        };
        let binary_threshold = || parse_or(args, "threshold", DEFAULT_BINARY_THRESHOLD);
        let morphology = |op: MorphologyOp| -> Result<Self, ConfigError> {
            Ok(Self::Morphology {
                op,
                kernel: parse_kernel(args, "kernel")?,
                threshold: binary_threshold()?,
            })
        };

        match name {
            "lowpass" => frequency(FrequencyFilter::LowPass {
                cutoff: parse(args, "cutoff")?,
            }),
            "highpass" => frequency(FrequencyFilter::HighPass {
                cutoff: parse(args, "cutoff")?,
            }),
            "bandpass" => frequency(FrequencyFilter::BandPass {
                low: parse(args, "low")?,
                high: parse(args, "high")?,
            }),
            "bandcut" => frequency(FrequencyFilter::BandCut {
                low: parse(args, "low")?,
                high: parse(args, "high")?,
            }),
            "directional" => {
                let range = AngleRange::new(parse(args, "min_angle")?, parse(args, "max_angle")?);
                let range = if parse_or(args, "mirror", true)? {
                    range
                } else {
                    range.without_mirror()
                };
                frequency(FrequencyFilter::Directional(range))
            }
            "phase" => frequency(FrequencyFilter::PhaseShift {
                k: parse(args, "k")?,
                l: parse(args, "l")?,
            }),
            "dilation" => morphology(MorphologyOp::Dilation),
            "erosion" => morphology(MorphologyOp::Erosion),
            "opening" => morphology(MorphologyOp::Opening),
            "closing" => morphology(MorphologyOp::Closing),
            "hmt" => Ok(Self::HitOrMiss {
                template: StructuringElement::parse(value(args, "template")?)?,
                threshold: binary_threshold()?,
            }),
            "iterative_dilation" => Ok(Self::IterativeDilation {
                seed: parse_point("seed", value(args, "seed")?)?,
                kernel: parse_kernel(args, "kernel")?,
                threshold: binary_threshold()?,
            }),
            "region_growing" => Ok(Self::RegionGrowing {
                seeds: value(args, "seeds")?
                    .split(';')
                    .map(|point| parse_point("seeds", point).map(Seed::from))
                    .collect::<Result<_, _>>()?,
                options: parse_region_options(args)?,
            }),
            "convolution" => Ok(Self::Convolution(match args.get("custom_mask") {
                Some(mask) => ConvolutionKernel::parse(mask)?,
                None => {
                    let name = args.get("filter").map_or("N", String::as_str);
                    DetailMask::from_name(name)
                        .ok_or_else(|| invalid("filter", name))?
                        .kernel()
                }
            })),
            "roberts" => Ok(Self::Roberts),
            "alpha" => Ok(Self::AlphaTrimmedMean {
                size: parse_or(args, "size", 3)?,
                alpha: parse_or(args, "alpha", 1)?,
            }),
            "gmean" => Ok(Self::GeometricMean {
                size: parse_or(args, "size", 3)?,
            }),
            "hpower" => Ok(Self::PowerTwoThirds {
                g_min: parse_or(args, "g_min", 0)?,
                g_max: parse_or(args, "g_max", 255)?,
            }),
            other => Err(ConfigError::UnknownOperation(other.to_string())),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Frequency { .. } => "frequency filter",
            Self::Morphology { .. } => "morphology",
            Self::HitOrMiss { .. } => "hit-or-miss",
            Self::IterativeDilation { .. } => "iterative dilation",
            Self::RegionGrowing { .. } => "region growing",
            Self::Convolution(_) => "convolution",
            Self::Roberts => "roberts",
            Self::AlphaTrimmedMean { .. } => "alpha-trimmed mean",
            Self::GeometricMean { .. } => "geometric mean",
            Self::PowerTwoThirds { .. } => "power 2/3 improvement",
        }
    }

    fn grayscale<'a>(&self, buffer: &'a PixelBuffer) -> Result<&'a Image<Luma<u8>>, Error> {
        match buffer {
            PixelBuffer::Luma(gray) => Ok(gray),
            PixelBuffer::Rgb(_) => Err(Error::UnsupportedMode {
                operation: self.name(),
                mode: buffer.mode().name(),
            }),
        }
    }

    /// Runs the operation.
    ///
    /// `extra_mask` is combined with frequency-filter masks and ignored by
    /// every other operation. Binary and segmentation operations accept
    /// grayscale buffers only.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation, or
    /// `Error::UnsupportedMode` for an RGB buffer where grayscale is required.
    pub fn apply(&self, buffer: &PixelBuffer, extra_mask: Option<&Mask>) -> Result<OperationOutput, Error> {
        let (width, height) = buffer.dimensions();
        debug!(
            operation = self.name(),
            width,
            height,
            mode = buffer.mode().name(),
            "applying operation"
        );

        match self {
            Self::Frequency { filter, variant } => Ok(match buffer {
                PixelBuffer::Luma(gray) => {
                    let (image, magnitude, mask) = run_frequency(gray, filter, extra_mask, *variant)?;
                    OperationOutput::Frequency {
                        image: PixelBuffer::Luma(image),
                        magnitude: PixelBuffer::Luma(magnitude),
                        mask,
                    }
                }
                PixelBuffer::Rgb(rgb) => {
                    let (image, magnitude, mask) = run_frequency(rgb, filter, extra_mask, *variant)?;
                    OperationOutput::Frequency {
                        image: PixelBuffer::Rgb(image),
                        magnitude: PixelBuffer::Rgb(magnitude),
                        mask,
                    }
                }
            }),
            Self::Morphology {
                op,
                kernel,
                threshold,
            } => {
                let binary = BinaryPlane::from_luma(self.grayscale(buffer)?, *threshold);
                Ok(OperationOutput::Binary(op.apply(&binary, kernel)))
            }
            Self::HitOrMiss {
                template,
                threshold,
            } => {
                let binary = BinaryPlane::from_luma(self.grayscale(buffer)?, *threshold);
                Ok(OperationOutput::Binary(hit_or_miss_template(&binary, template)))
            }
            Self::IterativeDilation {
                seed,
                kernel,
                threshold,
            } => {
                let binary = BinaryPlane::from_luma(self.grayscale(buffer)?, *threshold);
                Ok(OperationOutput::Binary(iterative_dilation(&binary, *seed, kernel)?))
            }
            Self::RegionGrowing { seeds, options } => Ok(OperationOutput::Labels(
                self.grayscale(buffer)?.region_growing(seeds, options)?,
            )),
            Self::Convolution(kernel) => map_buffer(buffer, |image| image.convolve_3x3(kernel), |image| {
                image.convolve_3x3(kernel)
            }),
            Self::Roberts => map_buffer(buffer, |image| image.roberts_cross(), |image| image.roberts_cross()),
            Self::AlphaTrimmedMean { size, alpha } => map_buffer(
                buffer,
                |image| image.alpha_trimmed_mean(*size, *alpha),
                |image| image.alpha_trimmed_mean(*size, *alpha),
            ),
            Self::GeometricMean { size } => map_buffer(
                buffer,
                |image| image.geometric_mean(*size),
                |image| image.geometric_mean(*size),
            ),
            Self::PowerTwoThirds { g_min, g_max } => map_buffer(
                buffer,
                |image| image.power_two_thirds(*g_min, *g_max),
                |image| image.power_two_thirds(*g_min, *g_max),
            ),
        }
    }
}

type FrequencyParts<P> = (Image<P>, Image<P>, Option<Image<Luma<u8>>>);

fn run_frequency<P>(
    image: &Image<P>,
    filter: &FrequencyFilter,
    extra_mask: Option<&Mask>,
    variant: TransformVariant,
) -> Result<FrequencyParts<P>, FilterError>
where
    P: Pixel<Subpixel = u8>,
{
    let output = image.frequency_filter(filter, extra_mask, variant)?;
    let magnitude = output.spectrum.magnitude_image()?;
    let mask = output.mask.as_ref().map(|mask| mask.to_image(true));
    Ok((output.image, magnitude, mask))
}

/// Runs a per-channel image filter on whichever layout the buffer holds.
fn map_buffer<E>(
    buffer: &PixelBuffer,
    luma: impl Fn(&Image<Luma<u8>>) -> Result<Image<Luma<u8>>, E>,
    rgb: impl Fn(&Image<image::Rgb<u8>>) -> Result<Image<image::Rgb<u8>>, E>,
) -> Result<OperationOutput, Error>
where
    Error: From<E>,
{
    let image = match buffer {
        PixelBuffer::Luma(gray) => PixelBuffer::Luma(luma(gray)?),
        PixelBuffer::Rgb(color) => PixelBuffer::Rgb(rgb(color)?),
    };
    Ok(OperationOutput::Image(image))
}
