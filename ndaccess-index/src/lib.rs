//! Coordinate-to-offset index strategies.
//!
//! An [`Index`] maps a coordinate tuple to a single linear element offset.
//! It is the pure-arithmetic half of a multidimensional accessor: it knows
//! nothing about the memory it addresses, only about sizes, strides, and
//! (for [`HyperslabIndex`]) a rectangular sub-selection.
//!
//! Three strategies are provided:
//!
//! - [`OneIndex`]: identity mapping for a single linear dimension
//! - [`StrideIndex`]: dot product of coordinates and per-dimension strides
//! - [`HyperslabIndex`]: HDF5-style offset/stride/count/block selection
//!   mapped through the underlying strides
//!
//! Coordinates, sizes, strides and offsets are all `i64`. A negative
//! coordinate therefore stays negative through the arithmetic and is caught
//! by the consumer's bounds check instead of wrapping.

use std::fmt;

mod hyperslab;

pub use hyperslab::HyperslabIndex;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while constructing an index strategy.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Parameter arrays disagree on the number of dimensions.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// A hyperslab block extent of zero was given for the dimension.
    #[error("zero block extent for dim {dim}")]
    ZeroBlock { dim: usize },
}

/// Result type for index construction.
pub type Result<T> = std::result::Result<T, IndexError>;

// ============================================================================
// Index trait
// ============================================================================

/// A pure function from coordinate tuples to linear element offsets.
///
/// All arities must agree: `index1(i) == index(&[i])`, and so on for the
/// two- and three-coordinate fast paths. Trailing coordinates beyond the
/// declared rank are ignored by [`StrideIndex`] and [`OneIndex`] (first
/// coordinate wins there); for [`HyperslabIndex`] exceeding the rank is a
/// contract violation surfaced as a panic.
pub trait Index {
    /// Number of dimensions.
    fn rank(&self) -> usize;

    /// Externally visible extent of each dimension.
    fn sizes(&self) -> &[i64];

    /// Extent of dimension `dim`.
    #[inline]
    fn size(&self, dim: usize) -> i64 {
        self.sizes()[dim]
    }

    /// Linear offset of the single coordinate `i`.
    fn index1(&self, i: i64) -> i64;

    /// Linear offset of the coordinate pair `(i, j)`.
    fn index2(&self, i: i64, j: i64) -> i64;

    /// Linear offset of the coordinate triple `(i, j, k)`.
    fn index3(&self, i: i64, j: i64, k: i64) -> i64;

    /// Linear offset of an arbitrary-rank coordinate tuple.
    fn index(&self, coords: &[i64]) -> i64;
}

/// Returns default (row-major contiguous) strides for the given sizes.
///
/// The last dimension has stride 1 and `strides[i] = strides[i + 1] *
/// sizes[i + 1]`. An empty `sizes` yields empty strides.
pub fn default_strides(sizes: &[i64]) -> Vec<i64> {
    let rank = sizes.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1i64; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * sizes[i + 1];
    }
    strides
}

// ============================================================================
// Coordinates
// ============================================================================

/// Coordinate tuples accepted by an accessor.
///
/// This is how the one-, two-, three- and n-coordinate access forms share a
/// single `get`/`put` surface: the scalar and tuple forms dispatch to the
/// matching [`Index`] fast path, arrays and slices go through the variadic
/// form, and all arities agree, so `get(5)`, `get((1, 2))`,
/// `get([1, 2, 3])` and `get(&coords[..])` route through the same
/// strategy.
pub trait Coordinates {
    /// Maps this coordinate tuple through `index`.
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64;
}

impl Coordinates for i64 {
    #[inline]
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64 {
        index.index1(*self)
    }
}

impl Coordinates for (i64, i64) {
    #[inline]
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64 {
        index.index2(self.0, self.1)
    }
}

impl Coordinates for (i64, i64, i64) {
    #[inline]
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64 {
        index.index3(self.0, self.1, self.2)
    }
}

impl<const N: usize> Coordinates for [i64; N] {
    #[inline]
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64 {
        index.index(self)
    }
}

impl Coordinates for &[i64] {
    #[inline]
    fn linearize<I: Index + ?Sized>(&self, index: &I) -> i64 {
        index.index(self)
    }
}

// ============================================================================
// OneIndex
// ============================================================================

/// Identity mapping over a single linear dimension.
///
/// Used when the backing store is already linear and coordinate 0 is the
/// only significant one: the first coordinate wins and any extra
/// coordinates of the fast-path arities are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneIndex {
    sizes: [i64; 1],
}

impl OneIndex {
    /// Creates an identity index over `size` elements.
    pub fn new(size: i64) -> Self {
        Self { sizes: [size] }
    }
}

impl Index for OneIndex {
    #[inline]
    fn rank(&self) -> usize {
        1
    }

    #[inline]
    fn sizes(&self) -> &[i64] {
        &self.sizes
    }

    #[inline]
    fn index1(&self, i: i64) -> i64 {
        i
    }

    #[inline]
    fn index2(&self, i: i64, _j: i64) -> i64 {
        i
    }

    #[inline]
    fn index3(&self, i: i64, _j: i64, _k: i64) -> i64 {
        i
    }

    #[inline]
    fn index(&self, coords: &[i64]) -> i64 {
        coords[0]
    }
}

// ============================================================================
// StrideIndex
// ============================================================================

/// Linear offset as the dot product of coordinates and strides.
///
/// `strides[i] > strides[i + 1]` with a trailing stride of 1 is the usual
/// row-major contiguous layout produced by [`default_strides`], but any
/// stride vector is accepted. Coordinates beyond `rank()` are ignored by
/// the variadic form.
#[derive(Clone, PartialEq, Eq)]
pub struct StrideIndex {
    sizes: Vec<i64>,
    strides: Vec<i64>,
}

impl fmt::Debug for StrideIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrideIndex")
            .field("sizes", &self.sizes)
            .field("strides", &self.strides)
            .finish()
    }
}

impl StrideIndex {
    /// Creates a row-major contiguous index over the given sizes.
    pub fn new(sizes: impl Into<Vec<i64>>) -> Self {
        let sizes = sizes.into();
        let strides = default_strides(&sizes);
        Self { sizes, strides }
    }

    /// Creates an index with explicit strides.
    pub fn with_strides(
        sizes: impl Into<Vec<i64>>,
        strides: impl Into<Vec<i64>>,
    ) -> Result<Self> {
        let sizes = sizes.into();
        let strides = strides.into();
        if sizes.len() != strides.len() {
            return Err(IndexError::RankMismatch(sizes.len(), strides.len()));
        }
        Ok(Self { sizes, strides })
    }

    /// The per-dimension linear-offset increments.
    #[inline]
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }
}

impl Index for StrideIndex {
    #[inline]
    fn rank(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    fn sizes(&self) -> &[i64] {
        &self.sizes
    }

    #[inline]
    fn index1(&self, i: i64) -> i64 {
        i * self.strides[0]
    }

    #[inline]
    fn index2(&self, i: i64, j: i64) -> i64 {
        i * self.strides[0] + j * self.strides[1]
    }

    #[inline]
    fn index3(&self, i: i64, j: i64, k: i64) -> i64 {
        i * self.strides[0] + j * self.strides[1] + k * self.strides[2]
    }

    fn index(&self, coords: &[i64]) -> i64 {
        let mut offset = 0;
        for d in 0..coords.len().min(self.strides.len()) {
            offset += coords[d] * self.strides[d];
        }
        offset
    }
}

// ============================================================================
// Tests
// ============================================================================
