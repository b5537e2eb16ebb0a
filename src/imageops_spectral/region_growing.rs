use crate::error::SegmentationError;
use crate::imageops_spectral::plane::{split_channels, ChannelPlane, LabelPlane, Plane};
use crate::imageops_spectral::summed_area_table::LocalDeviation;
use crate::Image;
use image::Luma;
use tracing::debug;

/// 領域拡張の開始点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub x: u32,
    pub y: u32,
}

impl From<(u32, u32)> for Seed {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// 近傍の定義
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 上下左右
    #[default]
    Four,
    /// 上下左右と斜め
    Eight,
}

impl Connectivity {
    const FOUR: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
    const EIGHT: [(i64, i64); 8] = [
        (0, -1),
        (0, 1),
        (-1, 0),
        (1, 0),
        (-1, -1),
        (-1, 1),
        (1, -1),
        (1, 1),
    ];

    #[must_use]
    pub const fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Self::Four => &Self::FOUR,
            Self::Eight => &Self::EIGHT,
        }
    }
}

/// 近傍画素を領域に取り込むかどうかの判定基準
///
/// 基準値はシード画素から求め、領域の成長中は更新しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomogeneityCriterion {
    /// `|近傍 − 基準| ≤ threshold`
    #[default]
    Intensity,
    /// `|近傍 − 基準| / max(基準, 1) ≤ threshold`
    Relative,
    /// 一辺 `window` の窓で求めた局所標準偏差の差が `threshold` 以下
    Texture { window: u32 },
}

/// 領域拡張のパラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGrowingOptions {
    pub threshold: f64,
    pub connectivity: Connectivity,
    pub criterion: HomogeneityCriterion,
}

impl RegionGrowingOptions {
    /// 4近傍・輝度基準で作成する
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            connectivity: Connectivity::default(),
            criterion: HomogeneityCriterion::default(),
        }
    }

    #[must_use]
    pub const fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[must_use]
    pub const fn with_criterion(mut self, criterion: HomogeneityCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    fn validate(&self) -> Result<(), SegmentationError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SegmentationError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        if let HomogeneityCriterion::Texture { window } = self.criterion {
            if window == 0 || window % 2 == 0 {
                return Err(SegmentationError::InvalidWindow { window });
            }
        }
        Ok(())
    }
}

/// 判定に使う特徴量の平面（輝度または局所標準偏差）
enum Feature<'a> {
    Value(&'a ChannelPlane),
    Deviation(LocalDeviation),
}

impl Feature<'_> {
    fn at(&self, x: u32, y: u32) -> f64 {
        match self {
            Self::Value(plane) => plane.get(x, y),
            Self::Deviation(deviation) => deviation.at(x, y),
        }
    }
}

/// シードごとに領域を拡張してラベル付けする
///
/// 各シードからスタックを使った塗りつぶしで領域を広げます。
/// 未訪問のシードごとに1から順に増加するラベルを割り当て、
/// 既に訪問済みのシードはスキップします。どの領域にも属さない画素は0のままです。
///
/// # 引数
///
/// * `plane` - 単一チャンネルの輝度平面
/// * `seeds` - 開始点（指定順に処理）
/// * `options` - しきい値・近傍・判定基準
///
/// # エラー
///
/// * `SegmentationError::SeedOutOfBounds` - シードが画像外の場合
/// * `SegmentationError::InvalidThreshold` - しきい値が負または有限でない場合
/// * `SegmentationError::InvalidWindow` - テクスチャ窓が0または偶数の場合
pub fn grow_regions(
    plane: &ChannelPlane,
    seeds: &[Seed],
    options: &RegionGrowingOptions,
) -> Result<LabelPlane, SegmentationError> {
    options.validate()?;
    let (width, height) = plane.dimensions();
    if let Some(seed) = seeds.iter().find(|s| s.x >= width || s.y >= height) {
        return Err(SegmentationError::SeedOutOfBounds {
            x: seed.x,
            y: seed.y,
            width,
            height,
        });
    }

    let feature = match options.criterion {
        HomogeneityCriterion::Texture { window } => {
            Feature::Deviation(LocalDeviation::new(plane, window / 2))
        }
        _ => Feature::Value(plane),
    };
    let accepts = |reference: f64, value: f64| {
        let difference = (value - reference).abs();
        match options.criterion {
            HomogeneityCriterion::Relative => difference / reference.max(1.0) <= options.threshold,
            _ => difference <= options.threshold,
        }
    };

    let mut visited = Plane::from_elem(width, height, false);
    let mut labels: LabelPlane = Plane::from_elem(width, height, 0);
    let mut next_label = 1u32;
    let mut stack = Vec::new();

    for seed in seeds {
        if visited.get(seed.x, seed.y) {
            continue;
        }

        let reference = feature.at(seed.x, seed.y);
        visited.set(seed.x, seed.y, true);
        stack.push((seed.x, seed.y));

        while let Some((x, y)) = stack.pop() {
            labels.set(x, y, next_label);

            for &(dx, dy) in options.connectivity.offsets() {
                let (nx, ny) = (i64::from(x) + dx, i64::from(y) + dy);
                if visited.get_signed(nx, ny) != Some(false) {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                if accepts(reference, feature.at(nx, ny)) {
                    visited.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }
        }

        next_label += 1;
    }

    debug!(
        width,
        height,
        seeds = seeds.len(),
        regions = next_label - 1,
        "region growing finished"
    );
    Ok(labels)
}

/// 領域拡張を提供するトレイト
pub trait RegionGrowing {
    /// 領域拡張を実行し、ラベル平面を返す
    ///
    /// # エラー
    ///
    /// [`grow_regions`] を参照
    fn region_growing(
        &self,
        seeds: &[Seed],
        options: &RegionGrowingOptions,
    ) -> Result<LabelPlane, SegmentationError>;
}

impl RegionGrowing for Image<Luma<u8>> {
    fn region_growing(
        &self,
        seeds: &[Seed],
        options: &RegionGrowingOptions,
    ) -> Result<LabelPlane, SegmentationError> {
        let planes = split_channels(self);
        grow_regions(&planes[0], seeds, options)
    }
}

impl Plane<u32> {
    /// ラベルを等間隔の輝度に割り当てた可視化画像
    ///
    /// ラベル0は黒、最大ラベルは255になります。
    #[must_use]
    pub fn labels_to_luma(&self) -> Image<Luma<u8>> {
        let max = self.data().iter().copied().max().unwrap_or(0);
        Image::from_fn(self.width(), self.height(), |x, y| {
            let label = self.get(x, y);
            if max == 0 {
                Luma([0])
            } else {
                Luma([(u64::from(label) * 255 / u64::from(max)) as u8])
            }
        })
    }

    /// 0以外の異なるラベルの数
    #[must_use]
    pub fn region_count(&self) -> usize {
        let mut seen: Vec<u32> = self.data().iter().copied().filter(|&l| l != 0).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
