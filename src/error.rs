use thiserror::Error;

/// Error type for Fourier transform operations
///
/// Raised before any computation starts, so a failed call never leaves
/// partially transformed data behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The fast transform was asked to process a length that is not a power of two
    ///
    /// Choose `TransformVariant::Naive` or crop/pad the image to a
    /// power-of-two size before using the fast path.
    #[error("Signal length {length} is not a power of two")]
    InvalidDimension { length: usize },

    /// The plane has no pixels
    #[error("Cannot transform an empty plane ({width}x{height})")]
    EmptyPlane { width: u32, height: u32 },

    /// Buffer length does not match the declared plane dimensions
    #[error("Plane data length {actual} does not match {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    /// Channel planes passed for reconstruction do not fit the pixel type
    #[error("Expected {expected} channel planes, got {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    /// Failed to create ImageBuffer from reconstructed pixels
    #[error("Failed to create ImageBuffer from reconstructed pixels")]
    ImageBufferCreationFailed,
}

/// Error type for structuring elements and convolution kernels
///
/// Surfaced while the kernel is built, before any pixel is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Kernel width or height is even, so there is no unique anchor
    #[error("Kernel dimensions must be odd, got {width}x{height}")]
    EvenDimension { width: u32, height: u32 },

    /// Kernel is not square where a square kernel is required
    #[error("Kernel must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    /// Kernel value list has the wrong number of elements
    #[error("Kernel requires exactly {expected} values, got {actual}")]
    WrongElementCount { expected: usize, actual: usize },

    /// Kernel has no cells at all
    #[error("Kernel must not be empty")]
    Empty,

    /// A kernel cell could not be interpreted
    #[error("Invalid kernel value: {0}")]
    InvalidValue(String),
}

/// Error type for auxiliary mask images
///
/// No default mask is ever substituted: an all-pass or all-block fallback
/// would silently change what the filter does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskImageError {
    /// The mask image could not be loaded or decoded
    #[error("Failed to decode mask image '{path}': {message}")]
    Decode { path: String, message: String },

    /// Mask and frequency plane dimensions do not match
    #[error("Mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },
}

/// Error type for the frequency filtering pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    MaskImage(#[from] MaskImageError),

    /// A filter parameter is outside its valid range
    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),
}

/// Error type for binary morphology
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphologyError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Seed point of the iterative dilation lies outside the image
    #[error("Seed ({x}, {y}) is outside the {width}x{height} image")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Two binary planes combined pointwise differ in shape
    #[error("Binary plane dimensions do not match: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Error type for region growing segmentation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentationError {
    /// Seed point lies outside the image
    #[error("Seed ({x}, {y}) is outside the {width}x{height} image")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Homogeneity threshold must be finite and non-negative
    #[error("Invalid threshold: {threshold}")]
    InvalidThreshold { threshold: f64 },

    /// Texture window must be odd and non-zero
    #[error("Texture window must be an odd positive size, got {window}")]
    InvalidWindow { window: u32 },
}

/// Error type for spatial filters and noise removal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialFilterError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The image has no pixels
    #[error("Image dimensions must be non-zero")]
    EmptyImage,

    /// Failed to create ImageBuffer from filtered pixels
    #[error("Failed to create ImageBuffer from filtered pixels")]
    ImageBufferCreationFailed,
}

/// Error type for statistics and similarity measures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// Images compared by a similarity measure differ in shape
    #[error("Image dimensions do not match: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The image has no pixels
    #[error("Cannot compute statistics of an empty image")]
    EmptyImage,
}

/// Error type for building operations from string-keyed parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No operation name was supplied or it is not recognized
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A required parameter is absent
    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    /// A parameter could not be parsed
    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Umbrella error returned by `Operation::apply`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Morphology(#[from] MorphologyError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    SpatialFilter(#[from] SpatialFilterError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operation does not accept images of this channel mode
    #[error("Operation '{operation}' does not support {mode} images")]
    UnsupportedMode {
        operation: &'static str,
        mode: &'static str,
    },
}
