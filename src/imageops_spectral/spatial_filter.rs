use crate::error::{KernelError, SpatialFilterError};
use crate::imageops_spectral::plane::{merge_channels, split_channels, ChannelPlane, Plane};
use crate::Image;
use image::Pixel;
use itertools::iproduct;

/// Predefined 3×3 detail-extraction masks named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMask {
    N,
    NE,
    E,
    SE,
}

impl DetailMask {
    #[must_use]
    pub const fn kernel(self) -> ConvolutionKernel {
        ConvolutionKernel::new(match self {
            Self::N => [1, 1, 1, 1, -2, 1, -1, -1, -1],
            Self::NE => [1, 1, 1, -1, -2, 1, -1, -1, 1],
            Self::E => [-1, 1, 1, -1, -2, 1, -1, 1, 1],
            Self::SE => [-1, -1, 1, -1, -2, 1, 1, 1, 1],
        })
    }

    /// Parses `N`, `NE`, `E` or `SE` (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "N" => Some(Self::N),
            "NE" => Some(Self::NE),
            "E" => Some(Self::E),
            "SE" => Some(Self::SE),
            _ => None,
        }
    }
}

/// Row-major 3×3 integer mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionKernel {
    values: [i32; 9],
}

impl ConvolutionKernel {
    #[must_use]
    pub const fn new(values: [i32; 9]) -> Self {
        Self { values }
    }

    /// Parses exactly nine comma-separated integers.
    ///
    /// # Errors
    ///
    /// * `KernelError::InvalidValue` - a token is not an integer
    /// * `KernelError::WrongElementCount` - not nine values
    pub fn parse(text: &str) -> Result<Self, KernelError> {
        let parsed = text
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<i32>()
                    .map_err(|_| KernelError::InvalidValue(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let values: [i32; 9] = parsed
            .as_slice()
            .try_into()
            .map_err(|_| KernelError::WrongElementCount {
                expected: 9,
                actual: parsed.len(),
            })?;
        Ok(Self { values })
    }

    #[must_use]
    pub const fn values(&self) -> &[i32; 9] {
        &self.values
    }

    fn weight(&self, dx: u32, dy: u32) -> f64 {
        f64::from(self.values[dy as usize * 3 + dx as usize])
    }
}

/// 3×3 convolution of one plane; the one-pixel frame is left at 0.
fn convolve_plane(plane: &ChannelPlane, kernel: &ConvolutionKernel) -> ChannelPlane {
    let (width, height) = plane.dimensions();
    Plane::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return 0.0;
        }
        let sum: f64 = iproduct!(0..3u32, 0..3u32)
            .map(|(dy, dx)| kernel.weight(dx, dy) * plane.get(x + dx - 1, y + dy - 1))
            .sum();
        sum.clamp(0.0, 255.0)
    })
}

/// Roberts cross of one plane; the last row and column are left at 0.
fn roberts_plane(plane: &ChannelPlane) -> ChannelPlane {
    let (width, height) = plane.dimensions();
    Plane::from_fn(width, height, |x, y| {
        if x + 1 >= width || y + 1 >= height {
            return 0.0;
        }
        let diagonal = (plane.get(x, y) - plane.get(x + 1, y + 1)).abs();
        let anti_diagonal = (plane.get(x + 1, y) - plane.get(x, y + 1)).abs();
        (diagonal + anti_diagonal).min(255.0)
    })
}

/// Applies `f` to every channel plane and reassembles the image.
pub(crate) fn map_channel_planes<P>(
    image: &Image<P>,
    f: impl Fn(&ChannelPlane) -> ChannelPlane,
) -> Result<Image<P>, SpatialFilterError>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SpatialFilterError::EmptyImage);
    }
    let planes: Vec<ChannelPlane> = split_channels(image).iter().map(f).collect();
    merge_channels(&planes).map_err(|_| SpatialFilterError::ImageBufferCreationFailed)
}

/// 空間フィルタを提供するトレイト
pub trait SpatialFilter {
    /// フィルタ処理の出力型
    type Output;

    /// フィルタ処理で発生する可能性のあるエラー型
    type Error;

    /// 3×3 マスクによる畳み込み
    ///
    /// マスクが収まらない外周1画素は0、結果は[0, 255]にクリップされます。
    fn convolve_3x3(&self, kernel: &ConvolutionKernel) -> Result<Self::Output, Self::Error>;

    /// Roberts II エッジ検出
    ///
    /// `|p(x,y) − p(x+1,y+1)| + |p(x+1,y) − p(x,y+1)|` を255で飽和させます。
    /// 最終行と最終列は0になります。
    fn roberts_cross(&self) -> Result<Self::Output, Self::Error>;
}

impl<P> SpatialFilter for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    type Output = Self;
    type Error = SpatialFilterError;

    fn convolve_3x3(&self, kernel: &ConvolutionKernel) -> Result<Self::Output, Self::Error> {
        map_channel_planes(self, |plane| convolve_plane(plane, kernel))
    }

    fn roberts_cross(&self) -> Result<Self::Output, Self::Error> {
        map_channel_planes(self, roberts_plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_rgb_image;
    use image::{Luma, Rgb};

    #[test]
    fn test_parse_custom_kernel() {
        let kernel = ConvolutionKernel::parse("0, 0, 0, 0, 1, 0, 0, 0, 0").unwrap();
        assert_eq!(kernel.values(), &[0, 0, 0, 0, 1, 0, 0, 0, 0]);

        assert_eq!(
            ConvolutionKernel::parse("1,2,3"),
            Err(KernelError::WrongElementCount {
                expected: 9,
                actual: 3
            })
        );
        assert!(matches!(
            ConvolutionKernel::parse("1,2,3,4,5,6,7,8,a"),
            Err(KernelError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_identity_kernel_keeps_interior() {
        let image: Image<Luma<u8>> = Image::from_fn(4, 4, |x, y| Luma([(x * 20 + y * 3) as u8]));
        let identity = ConvolutionKernel::new([0, 0, 0, 0, 1, 0, 0, 0, 0]);
        let output = image.convolve_3x3(&identity).unwrap();
        assert_eq!(output.get_pixel(1, 1), image.get_pixel(1, 1));
        assert_eq!(output.get_pixel(2, 2), image.get_pixel(2, 2));
        // 外周は0
        assert_eq!(output.get_pixel(0, 2)[0], 0);
        assert_eq!(output.get_pixel(3, 1)[0], 0);
    }

    #[test]
    fn test_detail_masks_sum_to_zero() {
        for mask in [DetailMask::N, DetailMask::NE, DetailMask::E, DetailMask::SE] {
            assert_eq!(mask.kernel().values().iter().sum::<i32>(), 0);
        }
        // 平坦な画像には応答しない
        let flat: Image<Luma<u8>> = Image::from_pixel(5, 5, Luma([90]));
        let output = flat.convolve_3x3(&DetailMask::NE.kernel()).unwrap();
        assert!(output.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_convolution_clips() {
        let image: Image<Luma<u8>> = Image::from_pixel(3, 3, Luma([200]));
        let double = ConvolutionKernel::new([0, 0, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(image.convolve_3x3(&double).unwrap().get_pixel(1, 1)[0], 255);
        let negate = ConvolutionKernel::new([0, 0, 0, 0, -1, 0, 0, 0, 0]);
        assert_eq!(image.convolve_3x3(&negate).unwrap().get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn test_detail_mask_names() {
        assert_eq!(DetailMask::from_name("ne"), Some(DetailMask::NE));
        assert_eq!(DetailMask::from_name("W"), None);
    }

    #[test]
    fn test_roberts_cross() {
        let image: Image<Luma<u8>> = Image::from_fn(3, 3, |x, _| Luma([if x == 0 { 0 } else { 100 }]));
        let edges = image.roberts_cross().unwrap();
        assert_eq!(edges.get_pixel(0, 0)[0], 200);
        assert_eq!(edges.get_pixel(1, 0)[0], 0);
        assert_eq!(edges.get_pixel(2, 0)[0], 0);
        assert_eq!(edges.get_pixel(0, 2)[0], 0);
    }

    #[test]
    fn test_roberts_on_rgb() {
        let image = create_test_rgb_image();
        let edges = image.roberts_cross().unwrap();
        // |200-50| + |100-150| = 200
        assert_eq!(edges.get_pixel(0, 0)[0], 200);
        // |150-75| + |200-100| = 175
        assert_eq!(edges.get_pixel(0, 0)[1], 175);
        assert_eq!(edges.get_pixel(1, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_empty_image() {
        let image: Image<Luma<u8>> = Image::new(0, 3);
        assert_eq!(image.roberts_cross(), Err(SpatialFilterError::EmptyImage));
    }
}
