mod error;
mod imageops_spectral;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Pixel};

pub use error::{
    ConfigError, Error, FilterError, KernelError, MaskImageError, MetricsError, MorphologyError,
    SegmentationError, SpatialFilterError, TransformError,
};
pub use imageops_spectral::fourier::{dft, fft, idft, ifft, Direction, TransformVariant};
pub use imageops_spectral::frequency_filter::{
    FilterOutput, FrequencyFilter, FrequencyFilterExt, Spectrum,
};
pub use imageops_spectral::frequency_grid::{signed_frequency, FrequencyGrid};
#[cfg(feature = "codecs")]
pub use imageops_spectral::frequency_mask::load_mask_image;
pub use imageops_spectral::frequency_mask::{
    apply_mask, band_cut, band_pass, directional, high_pass, low_pass, phase_shift, radial_mask,
    AngleRange, Mask,
};
pub use imageops_spectral::morphology::{
    closing, complement, dilation, erosion, erosion_with_border, hit_or_miss,
    hit_or_miss_template, intersection, iterative_dilation, opening, BorderValue,
};
pub use imageops_spectral::noise_removal::NoiseRemoval;
pub use imageops_spectral::operation::{MorphologyOp, Operation, OperationOutput};
pub use imageops_spectral::pixel_buffer::{ChannelMode, PixelBuffer};
pub use imageops_spectral::plane::{
    merge_channels, split_channels, BinaryPlane, ChannelPlane, FrequencyPlane, LabelPlane, Plane,
};
pub use imageops_spectral::region_growing::{
    grow_regions, Connectivity, HomogeneityCriterion, RegionGrowing, RegionGrowingOptions, Seed,
};
pub use imageops_spectral::similarity::{Similarity, SimilarityMeasures};
pub use imageops_spectral::spatial_filter::{ConvolutionKernel, DetailMask, SpatialFilter};
pub use imageops_spectral::statistics::{
    Histogram, HistogramImprovement, HistogramStatistics, ImageStatistics,
};
pub use imageops_spectral::structuring_element::{KernelCell, StructuringElement};
pub use imageops_spectral::summed_area_table::{LocalDeviation, SummedAreaTable};
pub use imageops_spectral::transform_2d::{forward_2d, inverse_2d, magnitude_spectrum, transform_2d};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
