use crate::error::TransformError;
use crate::imageops_spectral::plane::{merge_channels, split_channels, ChannelPlane};
use crate::Image;
use image::{DynamicImage, Luma, Rgb};

/// Channel layout of a decoded image, resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// One intensity per pixel
    Luma,
    /// Red, green, blue
    Rgb,
}

impl ChannelMode {
    #[must_use]
    pub const fn channel_count(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::Rgb => 3,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Luma => "grayscale",
            Self::Rgb => "RGB",
        }
    }
}

/// An 8-bit image of either supported channel layout.
///
/// Algorithms work on `N` channel planes and never branch per pixel on
/// the layout; the enum is only matched at the edges.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    Luma(Image<Luma<u8>>),
    Rgb(Image<Rgb<u8>>),
}

impl PixelBuffer {
    /// Converts a decoded image.
    ///
    /// 1-bit and grayscale sources become `Luma` (gray+alpha drops the alpha);
    /// every other layout is converted to `Rgb`.
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Self::Luma(gray.clone()),
            DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => Self::Luma(image.to_luma8()),
            _ => Self::Rgb(image.to_rgb8()),
        }
    }

    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Luma(gray) => DynamicImage::ImageLuma8(gray),
            Self::Rgb(rgb) => DynamicImage::ImageRgb8(rgb),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ChannelMode {
        match self {
            Self::Luma(_) => ChannelMode::Luma,
            Self::Rgb(_) => ChannelMode::Rgb,
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Luma(gray) => gray.dimensions(),
            Self::Rgb(rgb) => rgb.dimensions(),
        }
    }

    /// One real plane per channel, in channel order.
    #[must_use]
    pub fn to_planes(&self) -> Vec<ChannelPlane> {
        match self {
            Self::Luma(gray) => split_channels(gray),
            Self::Rgb(rgb) => split_channels(rgb),
        }
    }

    /// Rebuilds a buffer of the given mode, rounding and clipping each value.
    ///
    /// # Errors
    ///
    /// * `TransformError::ChannelCountMismatch` - wrong number of planes for `mode`
    /// * `TransformError::DimensionMismatch` - planes disagree on their shape
    pub fn from_planes(mode: ChannelMode, planes: &[ChannelPlane]) -> Result<Self, TransformError> {
        Ok(match mode {
            ChannelMode::Luma => Self::Luma(merge_channels(planes)?),
            ChannelMode::Rgb => Self::Rgb(merge_channels(planes)?),
        })
    }
}

impl From<Image<Luma<u8>>> for PixelBuffer {
    fn from(image: Image<Luma<u8>>) -> Self {
        Self::Luma(image)
    }
}

impl From<Image<Rgb<u8>>> for PixelBuffer {
    fn from(image: Image<Rgb<u8>>) -> Self {
        Self::Rgb(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_luma_image, create_test_rgb_image};
    use image::LumaA;

    #[test]
    fn from_dynamic_resolves_mode() {
        let gray = DynamicImage::ImageLuma8(create_test_luma_image());
        assert_eq!(PixelBuffer::from_dynamic(&gray).mode(), ChannelMode::Luma);

        let gray_alpha = DynamicImage::ImageLumaA8(Image::from_pixel(2, 2, LumaA([9, 128])));
        let buffer = PixelBuffer::from_dynamic(&gray_alpha);
        assert_eq!(buffer.mode(), ChannelMode::Luma);
        assert_eq!(buffer.to_planes()[0].get(1, 1), 9.0);

        let rgb = DynamicImage::ImageRgb8(create_test_rgb_image());
        assert_eq!(PixelBuffer::from_dynamic(&rgb).mode(), ChannelMode::Rgb);
    }

    #[test]
    fn planes_round_trip() {
        let buffer = PixelBuffer::from(create_test_rgb_image());
        let planes = buffer.to_planes();
        assert_eq!(planes.len(), ChannelMode::Rgb.channel_count());
        assert_eq!(PixelBuffer::from_planes(buffer.mode(), &planes).unwrap(), buffer);
    }

    #[test]
    fn from_planes_checks_channel_count() {
        let planes = PixelBuffer::from(create_test_luma_image()).to_planes();
        assert_eq!(
            PixelBuffer::from_planes(ChannelMode::Rgb, &planes).unwrap_err(),
            TransformError::ChannelCountMismatch {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn into_dynamic_keeps_pixels() {
        let image = create_test_luma_image();
        let dynamic = PixelBuffer::from(image.clone()).into_dynamic();
        assert_eq!(dynamic.to_luma8(), image);
    }
}
