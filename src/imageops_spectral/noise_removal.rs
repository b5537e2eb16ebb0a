use crate::error::{KernelError, SpatialFilterError};
use crate::imageops_spectral::plane::{ChannelPlane, Plane};
use crate::imageops_spectral::spatial_filter::map_channel_planes;
use crate::utils::{clamp_index, truncate_u8};
use crate::Image;
use image::Pixel;
use itertools::iproduct;

/// Smallest value entering the geometric mean; keeps `ln` finite on black pixels.
const GEOMETRIC_MEAN_FLOOR: f64 = 1e-10;

fn validate_window(size: u32) -> Result<(), SpatialFilterError> {
    if size == 0 {
        return Err(KernelError::Empty.into());
    }
    if size % 2 == 0 {
        return Err(KernelError::EvenDimension {
            width: size,
            height: size,
        }
        .into());
    }
    Ok(())
}

/// Collects the `size × size` neighbourhood of `(x, y)`, replicating edge pixels.
fn neighborhood(plane: &ChannelPlane, x: u32, y: u32, size: u32, buffer: &mut Vec<f64>) {
    let radius = i64::from(size / 2);
    buffer.clear();
    buffer.extend(
        iproduct!(-radius..=radius, -radius..=radius).map(|(dy, dx)| {
            plane.get(
                clamp_index(i64::from(x) + dx, plane.width()),
                clamp_index(i64::from(y) + dy, plane.height()),
            )
        }),
    );
}

fn alpha_trimmed_plane(plane: &ChannelPlane, size: u32, alpha: usize) -> ChannelPlane {
    let mut window = Vec::with_capacity(size as usize * size as usize);
    Plane::from_fn(plane.width(), plane.height(), |x, y| {
        neighborhood(plane, x, y, size, &mut window);
        window.sort_by(f64::total_cmp);
        let trim = alpha.min(window.len() / 2);
        let kept = &window[trim..window.len() - trim];
        let mean = kept.iter().sum::<f64>() / kept.len() as f64;
        f64::from(truncate_u8(mean))
    })
}

fn geometric_mean_plane(plane: &ChannelPlane, size: u32) -> ChannelPlane {
    let mut window = Vec::with_capacity(size as usize * size as usize);
    Plane::from_fn(plane.width(), plane.height(), |x, y| {
        neighborhood(plane, x, y, size, &mut window);
        let log_mean = window
            .iter()
            .map(|v| v.max(GEOMETRIC_MEAN_FLOOR).ln())
            .sum::<f64>()
            / window.len() as f64;
        // absorb exp/ln rounding before truncating
        f64::from(truncate_u8(log_mean.exp() + 1e-9))
    })
}

/// ノイズ除去フィルタを提供するトレイト
///
/// どちらのフィルタもチャンネルごとに処理し、画像端は端の画素を複製して扱います。
pub trait NoiseRemoval {
    /// フィルタ処理の出力型
    type Output;

    /// フィルタ処理で発生する可能性のあるエラー型
    type Error;

    /// アルファトリム平均フィルタ
    ///
    /// 窓内の値をソートし、両端から `alpha` 個ずつ（最大で窓の半分まで）
    /// 除いた残りの整数平均を出力します。
    ///
    /// # 引数
    ///
    /// * `size` - 窓の一辺（奇数）
    /// * `alpha` - 両端から除外する個数
    fn alpha_trimmed_mean(&self, size: u32, alpha: usize) -> Result<Self::Output, Self::Error>;

    /// 幾何平均フィルタ
    ///
    /// 各値を `1e-10` 以上にクリップしてから対数空間で平均し、整数に切り捨てます。
    fn geometric_mean(&self, size: u32) -> Result<Self::Output, Self::Error>;
}

impl<P> NoiseRemoval for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    type Output = Self;
    type Error = SpatialFilterError;

    fn alpha_trimmed_mean(&self, size: u32, alpha: usize) -> Result<Self::Output, Self::Error> {
        validate_window(size)?;
        map_channel_planes(self, |plane| alpha_trimmed_plane(plane, size, alpha))
    }

    fn geometric_mean(&self, size: u32) -> Result<Self::Output, Self::Error> {
        validate_window(size)?;
        map_channel_planes(self, |plane| geometric_mean_plane(plane, size))
    }
}
