use crate::error::TransformError;
use crate::utils::{image_from_raw, quantize_u8};
use crate::Image;
use image::Pixel;
use num_complex::Complex;

/// Row-major 2D grid shared by every stage of the toolkit.
///
/// The index of `(x, y)` is `y * width + x`. Planes are never mutated by
/// the public operations; each transform produces a new plane of the same
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    data: Vec<T>,
    width: u32,
    height: u32,
}

/// Real-valued plane holding one color channel.
pub type ChannelPlane = Plane<f64>;

/// Complex-valued plane in natural (unshifted) frequency order.
pub type FrequencyPlane = Plane<Complex<f64>>;

/// Plane of `{0, 1}` values used by the morphological operators.
pub type BinaryPlane = Plane<u8>;

/// Plane of region labels, `0` meaning unlabeled.
pub type LabelPlane = Plane<u32>;

impl<T: Copy> Plane<T> {
    /// Creates a plane filled with `value`.
    pub fn from_elem(width: u32, height: u32, value: T) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wraps a row-major buffer.
    ///
    /// # Errors
    ///
    /// * `TransformError::DimensionMismatch` - `data.len() != width * height`
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self, TransformError> {
        if data.len() != width as usize * height as usize {
            return Err(TransformError::DimensionMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a plane by evaluating `f(x, y)` for every position in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
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

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    #[inline]
    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the plane.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> T {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.data[self.index(x, y)]
    }

    /// Returns the value at signed coordinates, or `None` outside the plane.
    #[inline]
    #[must_use]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            None
        } else {
            Some(self.data[self.index(x as u32, y as u32)])
        }
    }

    /// Overwrites the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the plane.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        let index = self.index(x, y);
        self.data[index] = value;
    }

    #[must_use]
    pub fn row(&self, y: u32) -> &[T] {
        let start = self.index(0, y);
        &self.data[start..start + self.width as usize]
    }

    #[must_use]
    pub fn column(&self, x: u32) -> Vec<T> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }

    /// Applies `f` to every value.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Plane<U> {
        Plane {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Combines two planes of identical shape value by value.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn zip_map<U: Copy, V>(&self, other: &Plane<U>, f: impl Fn(T, U) -> V) -> Plane<V> {
        assert_eq!(self.dimensions(), other.dimensions());
        Plane {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Swaps rows and columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self.data[self.index(x, y)]);
            }
        }
        Self {
            data,
            width: self.height,
            height: self.width,
        }
    }

    /// Moves the zero-frequency sample to the centre (index `len / 2`) of both axes.
    ///
    /// Only used for display; filtering always works in natural order.
    #[must_use]
    pub fn fftshift(&self) -> Self {
        let (half_w, half_h) = (self.width / 2, self.height / 2);
        let mut data = self.data.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let sx = (x + half_w) % self.width;
                let sy = (y + half_h) % self.height;
                data[self.index(sx, sy)] = self.data[self.index(x, y)];
            }
        }
        Self {
            data,
            width: self.width,
            height: self.height,
        }
    }

    /// Inverse of [`Plane::fftshift`], also for odd lengths.
    #[must_use]
    pub fn ifftshift(&self) -> Self {
        let (half_w, half_h) = (self.width / 2, self.height / 2);
        Self::from_fn(self.width, self.height, |x, y| {
            self.get((x + half_w) % self.width, (y + half_h) % self.height)
        })
    }
}

/// Splits an 8-bit image into one real plane per channel, in channel order.
pub fn split_channels<P>(image: &Image<P>) -> Vec<ChannelPlane>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    (0..usize::from(P::CHANNEL_COUNT))
        .map(|channel| Plane {
            data: image
                .pixels()
                .map(|p| f64::from(p.channels()[channel]))
                .collect(),
            width,
            height,
        })
        .collect()
}

/// Reassembles channel planes into an 8-bit image, rounding and clipping each value.
///
/// # Errors
///
/// * `TransformError::ChannelCountMismatch` - plane count differs from `P::CHANNEL_COUNT`
/// * `TransformError::DimensionMismatch` - planes disagree on their shape
pub fn merge_channels<P>(planes: &[ChannelPlane]) -> Result<Image<P>, TransformError>
where
    P: Pixel<Subpixel = u8>,
{
    let expected = usize::from(P::CHANNEL_COUNT);
    if planes.len() != expected {
        return Err(TransformError::ChannelCountMismatch {
            expected,
            actual: planes.len(),
        });
    }

    let (width, height) = planes[0].dimensions();
    if let Some(bad) = planes.iter().find(|p| p.dimensions() != (width, height)) {
        return Err(TransformError::DimensionMismatch {
            width,
            height,
            actual: bad.len(),
        });
    }

    let mut raw = Vec::with_capacity(planes[0].len() * expected);
    for index in 0..planes[0].len() {
        raw.extend(planes.iter().map(|plane| quantize_u8(plane.data[index])));
    }

    image_from_raw(width, height, raw).ok_or(TransformError::ImageBufferCreationFailed)
}
