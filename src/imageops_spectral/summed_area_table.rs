use crate::imageops_spectral::plane::ChannelPlane;

/// 積分画像（Summed-Area Table）
///
/// 原点(0,0)から座標(x,y)までの矩形領域の累積和を保持し、
/// 任意の矩形和を O(1) で求めます。
/// 領域拡張のテクスチャ基準で局所標準偏差を計算するために使用します。
#[derive(Debug, Clone)]
pub struct SummedAreaTable {
    /// 累積和（行優先順序）
    data: Vec<f64>,
    width: u32,
    height: u32,
}

impl SummedAreaTable {
    /// チャンネル平面から積分画像を作成します
    ///
    /// # 引数
    /// * `plane` - 元となる実数平面
    #[must_use]
    pub fn new(plane: &ChannelPlane) -> Self {
        Self::from_values(plane.width(), plane.height(), plane.data().iter().copied())
    }

    /// 各値を二乗した平面の積分画像を作成します
    ///
    /// 分散 `E[X²] − E[X]²` の計算に使用します。
    #[must_use]
    pub fn squared(plane: &ChannelPlane) -> Self {
        Self::from_values(
            plane.width(),
            plane.height(),
            plane.data().iter().map(|v| v * v),
        )
    }

    fn from_values(width: u32, height: u32, values: impl Iterator<Item = f64>) -> Self {
        let w = width as usize;
        let mut data = Vec::with_capacity(w * height as usize);

        for (index, value) in values.enumerate() {
            let (x, y) = (index % w, index / w);

            // sat(x, y) = src(x, y) + sat(x-1, y) + sat(x, y-1) - sat(x-1, y-1)
            let mut sum = value;
            if x > 0 {
                sum += data[index - 1];
            }
            if y > 0 {
                sum += data[index - w];
            }
            if x > 0 && y > 0 {
                sum -= data[index - w - 1];
            }
            data.push(sum);
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// 指定座標での累積和、範囲外（負の座標）の場合は0
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> f64 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            0.0
        } else {
            self.data[y as usize * self.width as usize + x as usize]
        }
    }

    /// 矩形領域内の合計と画素数
    ///
    /// 矩形は画像範囲にクリップされます。座標はすべて含みます。
    ///
    /// # 計算式
    /// Sum = sat(x2, y2) - sat(x1-1, y2) - sat(x2, y1-1) + sat(x1-1, y1-1)
    #[must_use]
    pub fn rectangle_sum(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> (f64, usize) {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(i64::from(self.width) - 1);
        let y2 = y2.min(i64::from(self.height) - 1);

        if x1 > x2 || y1 > y2 {
            return (0.0, 0);
        }

        let sum = self.get(x2, y2) - self.get(x2, y1 - 1) - self.get(x1 - 1, y2)
            + self.get(x1 - 1, y1 - 1);
        let count = ((x2 - x1 + 1) * (y2 - y1 + 1)) as usize;
        (sum, count)
    }

    /// `(x, y)` を中心とする半径 `radius` の窓の平均
    #[must_use]
    pub fn window_mean(&self, x: u32, y: u32, radius: u32) -> f64 {
        let (x, y, r) = (i64::from(x), i64::from(y), i64::from(radius));
        let (sum, count) = self.rectangle_sum(x - r, y - r, x + r, y + r);
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// 値と二乗値の積分画像の組による局所標準偏差
#[derive(Debug, Clone)]
pub struct LocalDeviation {
    values: SummedAreaTable,
    squares: SummedAreaTable,
    radius: u32,
}

impl LocalDeviation {
    /// 一辺 `2 * radius + 1` の窓で局所標準偏差を求める準備をします
    #[must_use]
    pub fn new(plane: &ChannelPlane, radius: u32) -> Self {
        Self {
            values: SummedAreaTable::new(plane),
            squares: SummedAreaTable::squared(plane),
            radius,
        }
    }

    /// 画像端では窓を画像内にクリップして計算します
    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> f64 {
        let mean = self.values.window_mean(x, y, self.radius);
        let mean_sq = self.squares.window_mean(x, y, self.radius);
        // 丸め誤差で僅かに負になる場合がある
        (mean_sq - mean * mean).max(0.0).sqrt()
    }
}
