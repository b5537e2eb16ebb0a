use crate::imageops_spectral::plane::Plane;

/// 周波数座標グリッド
///
/// 自然順（シフトなし）の周波数平面に対応する符号付き周波数インデックスと、
/// そこから導かれる半径距離・角度を保持します。
/// `(width, height)` のみから決まる不変の値なので、一度作成して
/// 各マスク生成関数へ明示的に渡します。
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    /// 列ごとの符号付き周波数 U
    u: Vec<f64>,
    /// 行ごとの符号付き周波数 V
    v: Vec<f64>,
    /// √(U² + V²)
    distance: Plane<f64>,
    /// atan2(V, U) を度数法で [0, 360) に正規化した値
    angle: Plane<f64>,
}

/// 軸長 `length` のインデックスを符号付き周波数へ変換する
///
/// `i ≤ length / 2` ならそのまま、それ以外は `i − length`。
/// DC はインデックス 0、負の周波数は末尾に折り返されます。
#[must_use]
pub fn signed_frequency(index: u32, length: u32) -> i64 {
    if index <= length / 2 {
        i64::from(index)
    } else {
        i64::from(index) - i64::from(length)
    }
}

impl FrequencyGrid {
    /// 指定サイズの周波数グリッドを作成する
    ///
    /// # 引数
    ///
    /// * `width` - 周波数平面の幅
    /// * `height` - 周波数平面の高さ
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let u: Vec<f64> = (0..width)
            .map(|x| signed_frequency(x, width) as f64)
            .collect();
        let v: Vec<f64> = (0..height)
            .map(|y| signed_frequency(y, height) as f64)
            .collect();

        let distance = Plane::from_fn(width, height, |x, y| {
            u[x as usize].hypot(v[y as usize])
        });
        let angle = Plane::from_fn(width, height, |x, y| {
            v[y as usize]
                .atan2(u[x as usize])
                .to_degrees()
                .rem_euclid(360.0)
        });

        Self {
            distance,
            angle,
            u,
            v,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.distance.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.distance.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.distance.dimensions()
    }

    /// 列 `x` の符号付き周波数 U
    #[must_use]
    pub fn u(&self, x: u32) -> f64 {
        self.u[x as usize]
    }

    /// 行 `y` の符号付き周波数 V
    #[must_use]
    pub fn v(&self, y: u32) -> f64 {
        self.v[y as usize]
    }

    /// 半径距離フィールド
    #[must_use]
    pub fn distance(&self) -> &Plane<f64> {
        &self.distance
    }

    /// 角度フィールド（度、[0, 360)）
    #[must_use]
    pub fn angle_degrees(&self) -> &Plane<f64> {
        &self.angle
    }

    /// 角度フィールド（ラジアン、[0, 2π)）
    #[must_use]
    pub fn angle_radians(&self) -> Plane<f64> {
        self.angle.map(f64::to_radians)
    }

    /// ナイキスト周波数（短辺の半分）
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        f64::from(self.width().min(self.height()) / 2)
    }
}
