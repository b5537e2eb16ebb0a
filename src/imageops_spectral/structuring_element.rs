use crate::error::KernelError;
use itertools::iproduct;

/// State of one structuring-element cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelCell {
    /// The image must be foreground here
    Foreground,
    /// The image must be background here (hit-or-miss templates only)
    Background,
    /// Ignored by every operator
    DontCare,
}

impl KernelCell {
    /// Parses the integer encoding `1` / `0` / `-1`.
    ///
    /// # Errors
    ///
    /// * `KernelError::InvalidValue` - any other integer
    pub fn from_code(code: i32) -> Result<Self, KernelError> {
        match code {
            1 => Ok(Self::Foreground),
            0 => Ok(Self::Background),
            -1 => Ok(Self::DontCare),
            other => Err(KernelError::InvalidValue(format!(
                "{other} (expected 1, 0 or -1)"
            ))),
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Foreground => 1,
            Self::Background => 0,
            Self::DontCare => -1,
        }
    }
}

/// Small odd-sized kernel anchored at its centre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    cells: Vec<KernelCell>,
    width: u32,
    height: u32,
}

impl StructuringElement {
    /// Builds a kernel from row-major cells.
    ///
    /// # Errors
    ///
    /// * `KernelError::Empty` - a zero dimension
    /// * `KernelError::EvenDimension` - width or height is even
    /// * `KernelError::WrongElementCount` - `cells.len() != width * height`
    pub fn new(width: u32, height: u32, cells: Vec<KernelCell>) -> Result<Self, KernelError> {
        if width == 0 || height == 0 {
            return Err(KernelError::Empty);
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(KernelError::EvenDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(KernelError::WrongElementCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Builds a kernel from the `1` / `0` / `-1` integer encoding.
    ///
    /// # Errors
    ///
    /// See [`StructuringElement::new`] and [`KernelCell::from_code`].
    pub fn from_values(width: u32, height: u32, values: &[i32]) -> Result<Self, KernelError> {
        let cells = values
            .iter()
            .map(|&v| KernelCell::from_code(v))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(width, height, cells)
    }

    /// Parses rows separated by `;` and values separated by `,`,
    /// e.g. `"0,1,0;1,1,1;0,1,0"`.
    ///
    /// # Errors
    ///
    /// * `KernelError::InvalidValue` - a token is not an integer
    /// * `KernelError::WrongElementCount` - rows have different lengths
    /// * See [`StructuringElement::new`]
    pub fn parse(text: &str) -> Result<Self, KernelError> {
        let rows = text
            .split(';')
            .map(|row| {
                row.split(',')
                    .map(|token| {
                        let token = token.trim();
                        token
                            .parse::<i32>()
                            .map_err(|_| KernelError::InvalidValue(token.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(KernelError::WrongElementCount {
                expected: width,
                actual: bad.len(),
            });
        }
        let values: Vec<i32> = rows.concat();
        Self::from_values(width as u32, rows.len() as u32, &values)
    }

    /// 3×3 plus shape.
    #[must_use]
    pub fn cross() -> Self {
        use KernelCell::{Background as B, Foreground as F};
        Self {
            cells: vec![B, F, B, F, F, F, B, F, B],
            width: 3,
            height: 3,
        }
    }

    /// `size × size` block of foreground cells.
    ///
    /// # Errors
    ///
    /// * `KernelError::EvenDimension` / `KernelError::Empty` - see [`StructuringElement::new`]
    pub fn square(size: u32) -> Result<Self, KernelError> {
        Self::new(
            size,
            size,
            vec![KernelCell::Foreground; size as usize * size as usize],
        )
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Anchor position inside the kernel; also the padding radius.
    #[must_use]
    pub const fn anchor(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> KernelCell {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Offsets from the anchor of every cell in `state`.
    #[must_use]
    pub fn offsets(&self, state: KernelCell) -> Vec<(i64, i64)> {
        let (ax, ay) = self.anchor();
        iproduct!(0..self.height, 0..self.width)
            .filter(|&(y, x)| self.cell(x, y) == state)
            .map(|(y, x)| (i64::from(x) - i64::from(ax), i64::from(y) - i64::from(ay)))
            .collect()
    }

    /// Keeps the foreground cells, everything else becomes don't-care.
    #[must_use]
    pub fn foreground_kernel(&self) -> Self {
        self.remap(|cell| match cell {
            KernelCell::Foreground => KernelCell::Foreground,
            _ => KernelCell::DontCare,
        })
    }

    /// Background cells become the foreground of a new kernel, for eroding
    /// the complement image.
    #[must_use]
    pub fn background_kernel(&self) -> Self {
        self.remap(|cell| match cell {
            KernelCell::Background => KernelCell::Foreground,
            _ => KernelCell::DontCare,
        })
    }

    /// Kernel rotated by a half turn about its anchor.
    #[must_use]
    pub fn reflected(&self) -> Self {
        Self {
            cells: self.cells.iter().rev().copied().collect(),
            width: self.width,
            height: self.height,
        }
    }

    fn remap(&self, f: impl Fn(KernelCell) -> KernelCell) -> Self {
        Self {
            cells: self.cells.iter().map(|&c| f(c)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the anchor cell is foreground.
    #[must_use]
    pub fn contains_anchor(&self) -> bool {
        let (ax, ay) = self.anchor();
        self.cell(ax, ay) == KernelCell::Foreground
    }

    /// Whether the kernel equals its reflection through the anchor.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let n = self.cells.len();
        (0..n).all(|i| self.cells[i] == self.cells[n - 1 - i])
    }
}
