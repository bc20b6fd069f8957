use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Index, IndexMut, Mul};
use ndarray::{Array3, Axis, Ix3};
use ndarray_rand::rand::RngCore;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use crate::error::ConvNetError;
use crate::utils::{argmax, Array1F, Array3F, GenericResult, F};

/// Dimensions of a [Tensor]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub depth: usize,
}

impl Shape {
    pub const fn new(height: usize, width: usize, depth: usize) -> Self {
        Self { height, width, depth }
    }

    /// Shape of a column vector: (len, 1, 1)
    pub const fn column(len: usize) -> Self {
        Self::new(len, 1, 1)
    }

    pub const fn len(&self) -> usize {
        self.height * self.width * self.depth
    }

    /// Number of elements, or None if it doesn't fit in a usize
    pub fn checked_len(&self) -> Option<usize> {
        self.height.checked_mul(self.width)?.checked_mul(self.depth)
    }

    pub const fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0 || self.depth == 0
    }

    pub const fn is_column(&self) -> bool {
        self.width == 1 && self.depth == 1
    }

    /// Dimensions of the backing array: channels first
    fn dim(&self) -> Ix3 {
        Ix3(self.depth, self.height, self.width)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.height, self.width, self.depth)
    }
}

/// Dense 3-dimensional array addressed by (row, col, channel).
///
/// Values are stored channel-major, so the flat position of (row, col, channel) is
/// `channel * height * width + row * width + col`. That order is the one used by
/// [Tensor::flatten], [Tensor::reshape], [Tensor::to_vec] and the persisted weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Array3F,
}

impl Tensor {
    pub fn zeros(shape: Shape) -> Self {
        Self { data: Array3F::zeros(shape.dim()) }
    }

    pub fn from_elem(shape: Shape, value: F) -> Self {
        Self { data: Array3F::from_elem(shape.dim(), value) }
    }

    /// Wrap an array whose axes are (channel, row, col)
    pub fn from_array(data: Array3F) -> Self {
        Self { data }
    }

    /// Build a tensor from values in channel-major order
    pub fn from_vec(shape: Shape, values: Vec<F>) -> GenericResult<Self> {
        let len = values.len();
        Array3::from_shape_vec(shape.dim(), values)
            .map(|data| Self { data })
            .map_err(|_| ConvNetError::ElementCount { len, shape })
    }

    /// Column vector (len, 1, 1)
    pub fn column(values: Vec<F>) -> Self {
        Self { data: Array1F::from(values).insert_axis(Axis(0)).insert_axis(Axis(2)) }
    }

    /// Build a tensor from 8-bit samples interleaved per pixel (row by row, channels
    /// innermost), normalized into [0, 1]
    pub fn from_interleaved_bytes(shape: Shape, bytes: &[u8]) -> GenericResult<Self> {
        if bytes.len() != shape.len() {
            return Err(ConvNetError::ElementCount { len: bytes.len(), shape });
        }

        let Shape { width, depth, .. } = shape;
        let data = Array3F::from_shape_fn(shape.dim(), |(c, r, col)| {
            bytes[(r * width + col) * depth + c] as F / 255.0
        });
        Ok(Self { data })
    }

    /// Tensor filled with samples of N(0, sqrt(2 / len)) ('He normal' initialization)
    pub fn random(shape: Shape, rng: &mut dyn RngCore) -> GenericResult<Self> {
        let len = shape
            .checked_len()
            .ok_or_else(|| ConvNetError::InvalidConfig(format!("shape {} is too large", shape)))?;
        let std_dev = (2.0 / len.max(1) as F).sqrt();
        let dist = Normal::new(0.0, std_dev)?;
        Ok(Self { data: Array3F::random_using(shape.dim(), dist, rng) })
    }

    pub fn shape(&self) -> Shape {
        let (depth, height, width) = self.data.dim();
        Shape { height, width, depth }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<F> {
        self.data.get((channel, row, col)).copied()
    }

    /// Backing array, with axes (channel, row, col)
    pub fn as_array(&self) -> &Array3F {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array3F {
        &mut self.data
    }

    pub fn into_array(self) -> Array3F {
        self.data
    }

    /// Values in channel-major order
    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.data.iter()
    }

    pub fn to_vec(&self) -> Vec<F> {
        self.data.iter().copied().collect()
    }

    pub fn init_zeros(&mut self) {
        self.data.fill(0.0);
    }

    pub fn init_random(&mut self, rng: &mut dyn RngCore) -> GenericResult<()> {
        *self = Self::random(self.shape(), rng)?;
        Ok(())
    }

    pub fn map(&self, f: impl FnMut(F) -> F) -> Self {
        Self { data: self.data.mapv(f) }
    }

    /// -1, 0 or 1 according to the sign of each element
    pub fn sign(&self) -> Self {
        self.map(|o| if o > 0.0 { 1.0 } else if o < 0.0 { -1.0 } else { 0.0 })
    }

    pub fn sum(&self) -> F {
        self.data.sum()
    }

    /// Flat position of the first highest value
    pub fn argmax(&self) -> Option<usize> {
        argmax(self.data.iter())
    }

    /// Same values as a (len, 1, 1) column
    pub fn flatten(&self) -> Self {
        Self::column(self.to_vec())
    }

    pub fn reshape(&self, shape: Shape) -> GenericResult<Self> {
        Self::from_vec(shape, self.to_vec())
    }

    pub fn try_add(&self, other: &Tensor) -> GenericResult<Self> {
        self.check_same_shape(other)?;
        Ok(Self { data: &self.data + &other.data })
    }

    pub fn try_sub(&self, other: &Tensor) -> GenericResult<Self> {
        self.check_same_shape(other)?;
        Ok(Self { data: &self.data - &other.data })
    }

    /// Elementwise product
    pub fn try_mul(&self, other: &Tensor) -> GenericResult<Self> {
        self.check_same_shape(other)?;
        Ok(Self { data: &self.data * &other.data })
    }

    pub fn check_shape(&self, expected: Shape) -> GenericResult<()> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(ConvNetError::shape_mismatch(expected, self.shape()))
        }
    }

    fn check_same_shape(&self, other: &Tensor) -> GenericResult<()> {
        other.check_shape(self.shape())
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::zeros(Shape::default())
    }
}

impl Index<(usize, usize, usize)> for Tensor {
    type Output = F;

    fn index(&self, (row, col, channel): (usize, usize, usize)) -> &F {
        &self.data[(channel, row, col)]
    }
}

impl IndexMut<(usize, usize, usize)> for Tensor {
    fn index_mut(&mut self, (row, col, channel): (usize, usize, usize)) -> &mut F {
        &mut self.data[(channel, row, col)]
    }
}

impl Mul<F> for Tensor {
    type Output = Tensor;

    fn mul(self, rhs: F) -> Tensor {
        Tensor { data: self.data * rhs }
    }
}

impl Mul<F> for &Tensor {
    type Output = Tensor;

    fn mul(self, rhs: F) -> Tensor {
        Tensor { data: &self.data * rhs }
    }
}

impl Div<F> for Tensor {
    type Output = Tensor;

    fn div(self, rhs: F) -> Tensor {
        Tensor { data: self.data / rhs }
    }
}

impl Div<F> for &Tensor {
    type Output = Tensor;

    fn div(self, rhs: F) -> Tensor {
        Tensor { data: &self.data / rhs }
    }
}

impl Add<F> for Tensor {
    type Output = Tensor;

    fn add(self, rhs: F) -> Tensor {
        Tensor { data: self.data + rhs }
    }
}

impl Add<F> for &Tensor {
    type Output = Tensor;

    fn add(self, rhs: F) -> Tensor {
        Tensor { data: &self.data + rhs }
    }
}
