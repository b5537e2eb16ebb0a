use crate::error::MetricsError;
use crate::utils::truncate_u8;
use crate::Image;
use image::Pixel;

/// 1チャンネル分の256階調ヒストグラム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; 256],
}

/// ヒストグラムから求めた特徴量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramStatistics {
    /// 平均輝度 `Σ m·H(m) / N`
    pub mean: f64,
    /// 分散 `Σ (m − b̄)²·H(m) / N`
    pub variance: f64,
    /// 標準偏差
    pub standard_deviation: f64,
    /// 変動係数I `σ / b̄`（平均0のときは +∞）
    pub variation_coefficient_1: f64,
    /// 非対称係数 `Σ (m − b̄)³·H(m) / (N·σ³)`
    pub asymmetry_coefficient: f64,
    /// 平坦化係数 `Σ (m − b̄)⁴·H(m) / (N·σ⁴) − 3`
    pub flattening_coefficient: f64,
    /// 変動係数II `Σ H(m)² / N²`
    pub variation_coefficient_2: f64,
    /// 情報源エントロピー（ビット）
    pub entropy: f64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl Histogram {
    /// 画像の各チャンネルのヒストグラムをチャンネル順に返す
    pub fn of_channels<P>(image: &Image<P>) -> Vec<Self>
    where
        P: Pixel<Subpixel = u8>,
    {
        let mut histograms = vec![Self::default(); usize::from(P::CHANNEL_COUNT)];
        for pixel in image.pixels() {
            for (histogram, &value) in histograms.iter_mut().zip(pixel.channels()) {
                histogram.bins[usize::from(value)] += 1;
            }
        }
        histograms
    }

    #[must_use]
    pub const fn bins(&self) -> &[u64; 256] {
        &self.bins
    }

    /// 画素数 N
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// `Σ (m − center)^k·H(m) / N`
    fn central_moment(&self, center: f64, k: i32) -> f64 {
        let n = self.total() as f64;
        self.bins
            .iter()
            .enumerate()
            .map(|(m, &h)| (m as f64 - center).powi(k) * h as f64)
            .sum::<f64>()
            / n
    }

    /// 特徴量をまとめて計算する
    ///
    /// 標準偏差が0（一様な画像）の場合、非対称係数と平坦化係数は0とします。
    ///
    /// # エラー
    ///
    /// * `MetricsError::EmptyImage` - ヒストグラムが空の場合
    pub fn statistics(&self) -> Result<HistogramStatistics, MetricsError> {
        let total = self.total();
        if total == 0 {
            return Err(MetricsError::EmptyImage);
        }
        let n = total as f64;

        let mean = self.central_moment(0.0, 1);
        let variance = self.central_moment(mean, 2);
        let standard_deviation = variance.sqrt();

        let variation_coefficient_1 = if mean == 0.0 {
            f64::INFINITY
        } else {
            standard_deviation / mean
        };
        let (asymmetry_coefficient, flattening_coefficient) = if standard_deviation == 0.0 {
            (0.0, 0.0)
        } else {
            (
                self.central_moment(mean, 3) / standard_deviation.powi(3),
                self.central_moment(mean, 4) / standard_deviation.powi(4) - 3.0,
            )
        };

        let variation_coefficient_2 =
            self.bins.iter().map(|&h| (h as f64).powi(2)).sum::<f64>() / (n * n);
        let entropy = -self
            .bins
            .iter()
            .filter(|&&h| h > 0)
            .map(|&h| {
                let p = h as f64 / n;
                p * p.log2()
            })
            .sum::<f64>();

        Ok(HistogramStatistics {
            mean,
            variance,
            standard_deviation,
            variation_coefficient_1,
            asymmetry_coefficient,
            flattening_coefficient,
            variation_coefficient_2,
            entropy,
        })
    }

    /// 2/3乗確率密度関数による階調変換表
    ///
    /// 累積頻度 `c(f) = Σ_{m≤f} H(m) / N` から
    /// `g(f) = (g_min^(1/3) + (g_max^(1/3) − g_min^(1/3))·c(f))³` を求め、
    /// 切り捨てて8ビットにします。
    ///
    /// # エラー
    ///
    /// * `MetricsError::EmptyImage` - ヒストグラムが空の場合
    pub fn power_two_thirds_table(&self, g_min: u8, g_max: u8) -> Result<[u8; 256], MetricsError> {
        let total = self.total();
        if total == 0 {
            return Err(MetricsError::EmptyImage);
        }
        let n = total as f64;
        let low = f64::from(g_min).cbrt();
        let high = f64::from(g_max).cbrt();

        let mut table = [0u8; 256];
        let mut cumulative = 0u64;
        for (entry, &count) in table.iter_mut().zip(&self.bins) {
            cumulative += count;
            let g = (low + (high - low) * cumulative as f64 / n).powi(3);
            // 整数の立方が誤差で切り捨てられないように
            *entry = truncate_u8(g + 1e-9);
        }
        Ok(table)
    }
}

/// 画像のヒストグラム特徴量を提供するトレイト
pub trait ImageStatistics {
    /// チャンネルごとの特徴量（チャンネル順）
    ///
    /// # エラー
    ///
    /// * `MetricsError::EmptyImage` - 画像が空の場合
    fn channel_statistics(&self) -> Result<Vec<HistogramStatistics>, MetricsError>;
}

impl<P> ImageStatistics for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn channel_statistics(&self) -> Result<Vec<HistogramStatistics>, MetricsError> {
        Histogram::of_channels(self)
            .iter()
            .map(Histogram::statistics)
            .collect()
    }
}

/// ヒストグラムに基づく画質改善を提供するトレイト
pub trait HistogramImprovement {
    /// 処理の出力型
    type Output;
    /// エラー型
    type Error;

    /// 2/3乗確率密度関数による画質改善
    ///
    /// チャンネルごとのヒストグラムから変換表を作り、各画素に適用します。
    ///
    /// # 引数
    ///
    /// * `g_min` - 出力輝度の下限
    /// * `g_max` - 出力輝度の上限
    ///
    /// # エラー
    ///
    /// * `MetricsError::EmptyImage` - 画像が空の場合
    fn power_two_thirds(&self, g_min: u8, g_max: u8) -> Result<Self::Output, Self::Error>;
}

impl<P> HistogramImprovement for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    type Output = Self;
    type Error = MetricsError;

    fn power_two_thirds(&self, g_min: u8, g_max: u8) -> Result<Self::Output, Self::Error> {
        let tables = Histogram::of_channels(self)
            .iter()
            .map(|histogram| histogram.power_two_thirds_table(g_min, g_max))
            .collect::<Result<Vec<_>, _>>()?;

        let mut output = self.clone();
        for pixel in output.pixels_mut() {
            for (value, table) in pixel.channels_mut().iter_mut().zip(&tables) {
                *value = table[usize::from(*value)];
            }
        }
        Ok(output)
    }
}
